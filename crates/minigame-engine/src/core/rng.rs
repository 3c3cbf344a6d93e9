//! Seedable pseudo-random number generator (xorshift64).
//! Used for session tokens; the host seeds it from its own entropy.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Opaque identity token, e.g. `p-3f09a1c27be4d610`.
    pub fn session_token(&mut self) -> String {
        format!("p-{:016x}", self.next_u64())
    }
}
