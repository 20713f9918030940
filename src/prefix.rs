//! Description of the generic type `Prefix`.

#[cfg(feature = "ipnet")]
use ipnet::Ipv4Net;
use num_traits::{PrimInt, Unsigned, Zero};

/// Trait for defining prefixes stored in a [`crate::RouteTrie`].
pub trait Prefix: Sized {
    /// How the prefix and the looked-up addresses are represented. This must be one of `u8`,
    /// `u16`, `u32`, `u64`, or `u128`. Its bit width is the width of the addresses.
    type R: Unsigned + PrimInt + Zero;

    /// Get raw representation of the address, ignoring the prefix length.
    fn repr(&self) -> Self::R;

    /// Prefix length
    fn prefix_len(&self) -> u8;

    /// Number of bits in an address.
    fn width() -> u8 {
        Self::R::zero().count_zeros() as u8
    }

    /// mask `self.repr()` using `self.len()`. If you can guarantee that `repr` is already masked,
    /// them simply re-implement this function for your type.
    fn mask(&self) -> Self::R {
        self.repr() & mask_from_prefix_len(self.prefix_len())
    }

    /// Check if a specific bit is set (counted from the left, where 0 is the first bit from the
    /// left). Bits beyond the prefix length are never set.
    fn is_bit_set(&self, bit: u8) -> bool {
        is_addr_bit_set(self.mask(), bit)
    }

    /// Check if the top `self.prefix_len()` bits of `addr` are equal to the prefix. A prefix of
    /// length zero covers every address.
    fn covers(&self, addr: Self::R) -> bool {
        addr & mask_from_prefix_len(self.prefix_len()) == self.mask()
    }

    /// Compare two prefixes together
    fn eq(&self, other: &Self) -> bool {
        self.mask() == other.mask() && self.prefix_len() == other.prefix_len()
    }

    /// Render the prefix as a string of `'0'` and `'1'`, one character per address bit. Bits
    /// beyond the prefix length are rendered as `'0'`.
    fn binary_string(&self) -> String {
        (0..Self::width())
            .map(|bit| if self.is_bit_set(bit) { '1' } else { '0' })
            .collect()
    }
}

pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 >= R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

/// Check if bit `bit` of an address is set, counted from the most significant bit.
#[inline(always)]
pub(crate) fn is_addr_bit_set<R>(addr: R, bit: u8) -> bool
where
    R: PrimInt + Zero,
{
    let width = R::zero().count_zeros() as u8;
    if bit >= width {
        return false;
    }
    (addr >> (width - 1 - bit) as usize) & R::one() == R::one()
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv4Net {
    type R = u32;

    fn repr(&self) -> u32 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn width() -> u8 {
        32
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }

    fn eq(&self, other: &Self) -> bool {
        self.trunc() == other.trunc()
    }
}

impl<R> Prefix for (R, u8)
where
    R: Unsigned + PrimInt + Zero,
{
    type R = R;

    fn repr(&self) -> R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}
