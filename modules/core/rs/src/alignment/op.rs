use eyre::{bail, ensure, eyre, Result};

/// Kind of a single gapped-alignment operation (a subset of the SAM CIGAR operations).
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum OpKind {
    /// Aligned base, either a match or a mismatch (M)
    Match = 0,
    /// Base present in the read, absent in the reference (I)
    Insertion = 1,
    /// Base present in the reference, absent in the read (D)
    Deletion = 2,
    /// Clipped read base that is still stored in the sequence (S)
    SoftClip = 4,
    /// Clipped read base (H)
    HardClip = 5,
}

impl OpKind {
    /// Returns the CIGAR symbol of the operation.
    pub fn symbol(&self) -> char {
        match self {
            OpKind::Match => 'M',
            OpKind::Insertion => 'I',
            OpKind::Deletion => 'D',
            OpKind::SoftClip => 'S',
            OpKind::HardClip => 'H',
        }
    }

    /// Returns the numeric CIGAR code of the operation.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for OpKind {
    type Error = eyre::Report;

    /// Converts a numeric CIGAR code. Codes 3 (skip), 6 (pad), 7 (=) and 8 (X) are not supported.
    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(OpKind::Match),
            1 => Ok(OpKind::Insertion),
            2 => Ok(OpKind::Deletion),
            4 => Ok(OpKind::SoftClip),
            5 => Ok(OpKind::HardClip),
            _ => bail!("Unsupported alignment operation code: {code}"),
        }
    }
}

impl TryFrom<char> for OpKind {
    type Error = eyre::Report;

    fn try_from(symbol: char) -> Result<Self> {
        match symbol {
            'M' => Ok(OpKind::Match),
            'I' => Ok(OpKind::Insertion),
            'D' => Ok(OpKind::Deletion),
            'S' => Ok(OpKind::SoftClip),
            'H' => Ok(OpKind::HardClip),
            _ => bail!("Unsupported alignment operation: {symbol:?}"),
        }
    }
}

/// A run of `len` identical alignment operations.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Op {
    kind: OpKind,
    len: usize,
}

impl Op {
    pub fn new(kind: OpKind, len: usize) -> Self {
        Self { kind, len }
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl From<(OpKind, usize)> for Op {
    fn from((kind, len): (OpKind, usize)) -> Self {
        Op::new(kind, len)
    }
}

impl TryFrom<(u8, usize)> for Op {
    type Error = eyre::Report;

    fn try_from((code, len): (u8, usize)) -> Result<Self> {
        Ok(Op::new(OpKind::try_from(code)?, len))
    }
}

/// Parse a textual CIGAR string (e.g. `5S4M2I`) into a list of operations.
pub fn parse_cigar(cigar: &str) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    let mut len: Option<usize> = None;

    for symbol in cigar.chars() {
        if let Some(digit) = symbol.to_digit(10) {
            let current = len.unwrap_or(0);
            len = Some(
                current
                    .checked_mul(10)
                    .and_then(|x| x.checked_add(digit as usize))
                    .ok_or_else(|| eyre!("CIGAR operation length overflow: {cigar}"))?,
            );
        } else {
            let len = len
                .take()
                .ok_or_else(|| eyre!("Missing operation length in CIGAR: {cigar}"))?;
            ops.push(Op::new(OpKind::try_from(symbol)?, len));
        }
    }
    ensure!(len.is_none(), "Dangling operation length in CIGAR: {cigar}");

    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_kind_codes() {
        for kind in [
            OpKind::Match,
            OpKind::Insertion,
            OpKind::Deletion,
            OpKind::SoftClip,
            OpKind::HardClip,
        ] {
            assert_eq!(OpKind::try_from(kind.code()).unwrap(), kind);
            assert_eq!(OpKind::try_from(kind.symbol()).unwrap(), kind);
        }

        for code in [3, 6, 7, 8, 9, 255] {
            assert!(OpKind::try_from(code).is_err(), "Code: {code}");
        }
        for symbol in ['N', 'P', '=', 'X', 'm'] {
            assert!(OpKind::try_from(symbol).is_err(), "Symbol: {symbol}");
        }
    }

    #[test]
    fn test_parse_cigar() -> Result<()> {
        assert_eq!(
            parse_cigar("5S4M2I")?,
            vec![
                Op::new(OpKind::SoftClip, 5),
                Op::new(OpKind::Match, 4),
                Op::new(OpKind::Insertion, 2)
            ]
        );
        assert_eq!(
            parse_cigar("120M3D1H")?,
            vec![
                Op::new(OpKind::Match, 120),
                Op::new(OpKind::Deletion, 3),
                Op::new(OpKind::HardClip, 1)
            ]
        );
        assert!(parse_cigar("")?.is_empty());

        for invalid in ["M", "4", "4M3", "3N", "2=", "4M 2I"] {
            assert!(parse_cigar(invalid).is_err(), "CIGAR: {invalid}");
        }
        Ok(())
    }
}
