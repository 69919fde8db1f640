use std::fmt::{Display, Formatter};
use std::ops::{AddAssign, Index, IndexMut};

use derive_more::From;

/// Nucleotides tracked by the per-base mismatch counters.
/// The declaration order is the reporting order of the result tables.
#[repr(u8)]
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Debug)]
pub enum Nuc {
    A,
    T,
    C,
    G,
}

impl Nuc {
    pub const ALL: [Nuc; 4] = [Nuc::A, Nuc::T, Nuc::C, Nuc::G];

    pub fn symbol(&self) -> u8 {
        match self {
            Nuc::A => b'A',
            Nuc::T => b'T',
            Nuc::C => b'C',
            Nuc::G => b'G',
        }
    }

    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Nuc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol() as char)
    }
}

impl TryFrom<u8> for Nuc {
    type Error = u8;

    /// Only upper-case symbols are accepted. Anything else (IUPAC ambiguity codes, soft-masked
    /// lower-case letters, gaps) is returned back as an error.
    #[inline]
    fn try_from(symbol: u8) -> Result<Self, Self::Error> {
        match symbol {
            b'A' => Ok(Nuc::A),
            b'T' => Ok(Nuc::T),
            b'C' => Ok(Nuc::C),
            b'G' => Ok(Nuc::G),
            _ => Err(symbol),
        }
    }
}

/// A fixed-size container holding one value per [Nuc].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, From)]
pub struct PerNuc<T>([T; 4]);

impl<T> PerNuc<T> {
    pub fn get(&self, nuc: Nuc) -> &T {
        &self.0[nuc.index()]
    }

    pub fn get_mut(&mut self, nuc: Nuc) -> &mut T {
        &mut self.0[nuc.index()]
    }

    /// Iterate over (nucleotide, value) pairs in the A, T, C, G order.
    pub fn iter(&self) -> impl Iterator<Item = (Nuc, &T)> {
        Nuc::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(self, mut f: impl FnMut(Nuc, T) -> U) -> PerNuc<U> {
        let [a, t, c, g] = self.0;
        PerNuc([f(Nuc::A, a), f(Nuc::T, t), f(Nuc::C, c), f(Nuc::G, g)])
    }

    /// Combine two containers element-wise.
    pub fn zip_with<U, R>(self, other: PerNuc<U>, mut f: impl FnMut(Nuc, T, U) -> R) -> PerNuc<R> {
        let [a1, t1, c1, g1] = self.0;
        let [a2, t2, c2, g2] = other.0;
        PerNuc([
            f(Nuc::A, a1, a2),
            f(Nuc::T, t1, t2),
            f(Nuc::C, c1, c2),
            f(Nuc::G, g1, g2),
        ])
    }

    pub fn into_inner(self) -> [T; 4] {
        self.0
    }
}

impl<T> Index<Nuc> for PerNuc<T> {
    type Output = T;

    fn index(&self, nuc: Nuc) -> &Self::Output {
        self.get(nuc)
    }
}

impl<T> IndexMut<Nuc> for PerNuc<T> {
    fn index_mut(&mut self, nuc: Nuc) -> &mut Self::Output {
        self.get_mut(nuc)
    }
}

impl<T: AddAssign> AddAssign for PerNuc<T> {
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs += rhs;
        }
    }
}
