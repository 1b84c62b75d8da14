// See: https://people.csail.mit.edu/rivest/pubs/RS14.pdf for the Spritz paper.
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use zeroize::ZeroizeOnDrop;

use crate::error::Error;
use crate::state::SpritzState;

/// A Spritz sponge.
///
/// Data is fed in with the `absorb` family of methods, and output is pulled
/// out with the `squeeze` family. The two can be interleaved freely: the
/// first squeeze after any absorption shuffles the state, finishing that
/// absorption, and subsequent squeezes continue the same output stream.
///
/// The state is wiped when the sponge is dropped.
#[cfg_attr(test, derive(Debug))]
#[derive(Clone, Default, ZeroizeOnDrop)]
pub struct Spritz {
    state: SpritzState,
}

impl Spritz {
    /// Create a sponge in the canonical initial state.
    pub fn new() -> Self {
        Self {
            state: SpritzState::new(),
        }
    }

    /// Return to the initial state, forgetting everything absorbed or squeezed.
    pub fn reset(&mut self) {
        self.state = SpritzState::new();
    }

    /// Absorb some data into this sponge.
    pub fn absorb(&mut self, data: &[u8]) {
        for &b in data {
            self.state.absorb_byte(b);
        }
    }

    /// Absorb a single byte, low nibble first.
    pub fn absorb_byte(&mut self, b: u8) {
        self.state.absorb_byte(b);
    }

    /// Absorb a separator between two fields.
    ///
    /// This makes sure that `absorb(x); absorb_stop(); absorb(y)` can't be
    /// confused with a different split of the same bytes. A stop with nothing
    /// absorbed after it is erased by the shuffle at the next squeeze.
    pub fn absorb_stop(&mut self) {
        self.state.absorb_stop();
    }

    /// Absorb a non-negative integer.
    ///
    /// The number is absorbed as its minimal little endian encoding, with
    /// zero being absorbed as a single zero byte. Negative values, or values
    /// which don't fit in a `u64`, are rejected without modifying the state.
    pub fn absorb_number<T: TryInto<u64>>(&mut self, n: T) -> Result<(), Error> {
        let mut n: u64 = n.try_into().map_err(|_| Error::InvalidArgument)?;
        loop {
            self.state.absorb_byte(n as u8);
            n >>= 8;
            if n == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Squeeze out a single byte.
    pub fn drip(&mut self) -> u8 {
        self.state.finish_absorbing();
        self.state.drip_one()
    }

    /// Squeeze out `len` bytes.
    ///
    /// Even with `len = 0`, any pending absorption is finished.
    #[cfg(feature = "alloc")]
    pub fn squeeze(&mut self, len: usize) -> Vec<u8> {
        self.state.finish_absorbing();
        (0..len).map(|_| self.state.drip_one()).collect()
    }

    /// Like [`Spritz::squeeze`], but reporting allocation failure.
    ///
    /// If the allocation fails, the state is left untouched.
    #[cfg(feature = "alloc")]
    pub fn try_squeeze(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        out.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
        self.state.finish_absorbing();
        out.extend((0..len).map(|_| self.state.drip_one()));
        Ok(out)
    }

    /// Fill a buffer with squeezed bytes, overwriting its contents.
    pub fn squeeze_into(&mut self, data: &mut [u8]) {
        self.state.finish_absorbing();
        for b in data {
            *b = self.state.drip_one();
        }
    }

    /// XOR squeezed bytes into a buffer, in place.
    ///
    /// Doing this again from the same state undoes the operation.
    pub fn squeeze_xor(&mut self, data: &mut [u8]) {
        self.state.finish_absorbing();
        for b in data {
            *b ^= self.state.drip_one();
        }
    }

    /// Squeeze out `len` bytes, and throw them away.
    pub fn skip(&mut self, len: usize) {
        self.state.finish_absorbing();
        for _ in 0..len {
            self.state.drip_one();
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &SpritzState {
        &self.state
    }
}
