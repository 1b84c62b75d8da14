use subtle::{ConditionallySelectable, ConstantTimeGreater};
use zeroize::Zeroize;

/// The number of entries in the permutation.
pub const N: usize = 256;
/// How many nibbles can be absorbed before the state has to be shuffled.
pub const ABSORB_CAPACITY: u8 = (N / 2) as u8;
/// The number of update rounds in a single whip.
const WHIP_ROUNDS: usize = 2 * N;

/// The raw Spritz state: a permutation of the bytes, along with its registers.
///
/// Everything in here works modulo 256, which we get for free by using `u8`
/// with wrapping arithmetic. Note that this relies on N being a power of two,
/// since `w` needs to stay coprime to N, and we only ever add 2 to it.
#[derive(Clone, Zeroize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct SpritzState {
    pub(crate) mem: [u8; N],
    pub(crate) i: u8,
    pub(crate) j: u8,
    pub(crate) k: u8,
    pub(crate) z: u8,
    pub(crate) a: u8,
    pub(crate) w: u8,
}

impl SpritzState {
    /// The canonical initial state, with `mem` set to the identity.
    pub fn new() -> Self {
        let mut mem = [0u8; N];
        for (x, v) in mem.iter_mut().enumerate() {
            *v = x as u8;
        }
        Self {
            mem,
            i: 0,
            j: 0,
            k: 0,
            z: 0,
            a: 0,
            w: 1,
        }
    }

    #[inline(always)]
    fn at(&self, x: u8) -> u8 {
        self.mem[x as usize]
    }

    pub fn update(&mut self, times: usize) {
        // Work on local copies of the registers, writing them back at the end.
        let (mut i, mut j, mut k) = (self.i, self.j, self.k);
        let w = self.w;
        for _ in 0..times {
            i = i.wrapping_add(w);
            j = k.wrapping_add(self.at(j.wrapping_add(self.at(i))));
            k = i.wrapping_add(k).wrapping_add(self.at(j));
            self.mem.swap(i as usize, j as usize);
        }
        self.i = i;
        self.j = j;
        self.k = k;
    }

    pub fn whip(&mut self, amount: usize) {
        self.update(amount);
        self.w = self.w.wrapping_add(2);
    }

    /// Order each symmetric pair `(mem[v], mem[N - 1 - v])`.
    ///
    /// This is a single pass over the pairs, and not a sort. The swap is done
    /// without branching on the contents of the permutation.
    pub fn crush(&mut self) {
        let (low, high) = self.mem.split_at_mut(N / 2);
        for (v, x) in low.iter_mut().enumerate() {
            let y = &mut high[N / 2 - 1 - v];
            let out_of_order = x.ct_gt(y);
            u8::conditional_swap(x, y, out_of_order);
        }
    }

    pub fn shuffle(&mut self) {
        self.whip(WHIP_ROUNDS);
        self.crush();
        self.whip(WHIP_ROUNDS);
        self.crush();
        self.whip(WHIP_ROUNDS);
        self.a = 0;
    }

    /// Absorb a nibble, which must be < 16.
    pub fn absorb_nibble(&mut self, x: u8) {
        debug_assert!(x < 16, "nibble out of range: {}", x);
        if self.a == ABSORB_CAPACITY {
            self.shuffle();
        }
        self.mem
            .swap(self.a as usize, ABSORB_CAPACITY as usize + (x & 0xF) as usize);
        self.a += 1;
    }

    /// Absorb a byte, low nibble first.
    #[inline(always)]
    pub fn absorb_byte(&mut self, b: u8) {
        self.absorb_nibble(b & 0xF);
        self.absorb_nibble(b >> 4);
    }

    /// Advance the absorbed count without touching the permutation.
    pub fn absorb_stop(&mut self) {
        if self.a == ABSORB_CAPACITY {
            self.shuffle();
        }
        self.a += 1;
    }

    /// Shuffle, if anything has been absorbed since the last shuffle.
    #[inline(always)]
    pub fn finish_absorbing(&mut self) {
        if self.a > 0 {
            self.shuffle();
        }
    }

    /// Produce a single output byte, advancing the state by one update.
    pub fn drip_one(&mut self) -> u8 {
        self.update(1);
        let t0 = self.at(self.z.wrapping_add(self.k));
        let t1 = self.at(self.i.wrapping_add(t0));
        self.z = self.at(self.j.wrapping_add(t1));
        self.z
    }
}

impl Default for SpritzState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{SpritzState, ABSORB_CAPACITY, N};

    fn is_permutation(state: &SpritzState) -> bool {
        let mut seen = [false; N];
        for &v in state.mem.iter() {
            seen[v as usize] = true;
        }
        seen.iter().all(|&b| b)
    }

    #[test]
    fn test_initial_state_is_identity() {
        let state = SpritzState::new();
        for (x, &v) in state.mem.iter().enumerate() {
            assert_eq!(x as u8, v);
        }
        assert_eq!((state.i, state.j, state.k, state.z, state.a), (0, 0, 0, 0, 0));
        assert_eq!(state.w, 1);
    }

    #[test]
    fn test_first_drip_from_identity() {
        let mut state = SpritzState::new();
        assert_eq!(state.drip_one(), 4);
        assert_eq!((state.i, state.j, state.k, state.z), (1, 1, 2, 4));
        assert_eq!(state.w, 1);
        assert_eq!(state.a, 0);
        assert_eq!(state.mem, SpritzState::new().mem);
    }

    #[test]
    fn test_update_keeps_permutation() {
        let mut state = SpritzState::new();
        state.update(10_000);
        assert!(is_permutation(&state));
        assert_ne!(state.mem, SpritzState::new().mem);
    }

    #[test]
    fn test_whip_keeps_w_odd() {
        let mut state = SpritzState::new();
        for _ in 0..300 {
            state.whip(3);
            assert_eq!(state.w % 2, 1);
        }
    }

    #[test]
    fn test_crush_orders_pairs() {
        let mut state = SpritzState::new();
        state.mem.reverse();
        state.crush();
        for v in 0..N / 2 {
            assert!(state.mem[v] <= state.mem[N - 1 - v]);
        }
        assert_eq!(state.mem, SpritzState::new().mem);
    }

    #[test]
    fn test_crush_is_idempotent() {
        let mut state = SpritzState::new();
        state.update(777);
        state.crush();
        let once = state.clone();
        state.crush();
        assert_eq!(once, state);
    }

    #[test]
    fn test_shuffle_resets_absorbed_count() {
        let mut state = SpritzState::new();
        state.absorb_byte(0xAB);
        assert_eq!(state.a, 2);
        state.shuffle();
        assert_eq!(state.a, 0);
        // Three whips.
        assert_eq!(state.w, 7);
        assert!(is_permutation(&state));
    }

    #[test]
    fn test_absorb_nibble_swaps_into_upper_half() {
        let mut state = SpritzState::new();
        state.absorb_nibble(5);
        assert_eq!(state.mem[0], 133);
        assert_eq!(state.mem[133], 0);
        assert_eq!(state.a, 1);
    }

    #[test]
    fn test_absorb_stop_leaves_permutation_alone() {
        let mut state = SpritzState::new();
        state.absorb_stop();
        assert_eq!(state.a, 1);
        assert_eq!(state.mem, SpritzState::new().mem);
    }

    #[test]
    fn test_full_absorption_forces_shuffle() {
        let mut state = SpritzState::new();
        for _ in 0..ABSORB_CAPACITY {
            state.absorb_nibble(0);
        }
        assert_eq!(state.a, ABSORB_CAPACITY);
        assert_eq!(state.w, 1);
        state.absorb_nibble(0);
        assert_eq!(state.a, 1);
        assert_eq!(state.w, 7);
    }
}
