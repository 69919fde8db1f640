use std::io;

use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::cigar::Op as CigarOp;
use noodles::sam::alignment::record::{Cigar, Sequence};

use mutscan_core_rs::alignment::{AlignedRead, Op, OpKind};

/// Outcome of converting a SAM/BAM record into an [AlignedRead].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converted {
    /// The read has a query sequence and a supported, non-empty alignment
    Aligned,
    /// Unmapped read, missing sequence or missing CIGAR. The read carries no information.
    Uninformative,
    /// The CIGAR contains operations outside of M/I/D/S/H. Operations are dropped.
    Unsupported,
}

pub fn op_kind(kind: Kind) -> Option<OpKind> {
    match kind {
        Kind::Match => Some(OpKind::Match),
        Kind::Insertion => Some(OpKind::Insertion),
        Kind::Deletion => Some(OpKind::Deletion),
        Kind::SoftClip => Some(OpKind::SoftClip),
        Kind::HardClip => Some(OpKind::HardClip),
        Kind::Skip | Kind::Pad | Kind::SequenceMatch | Kind::SequenceMismatch => None,
    }
}

/// Fill `saveto` with the alignment operations. Returns `false` if any of them is unsupported.
pub fn parse_cigar(
    cigar: impl Iterator<Item = io::Result<CigarOp>>,
    saveto: &mut Vec<Op>,
) -> io::Result<bool> {
    for op in cigar {
        let op = op?;
        match op_kind(op.kind()) {
            Some(kind) => saveto.push(Op::new(kind, op.len())),
            None => return Ok(false),
        }
    }
    Ok(true)
}

// SAM and BAM records expose the same accessors as inherent methods with different return types.
// Sequence and CIGAR are iterated through the shared alignment record traits.
macro_rules! impl_convert {
    ($name:ident, $record:ty) => {
        pub fn $name(record: &$record, into: &mut AlignedRead) -> io::Result<Converted> {
            // Absent alignment start (unmapped read) is reported as -1, same as the missing CIGAR
            let start = match record.alignment_start().transpose()? {
                Some(position) => position.get() as i64 - 1,
                None => -1,
            };

            let (name, sequence, ops) = into.recycle(start);
            if let Some(x) = record.name() {
                let x: &[u8] = x.as_ref();
                name.push_str(&String::from_utf8_lossy(x));
            }
            sequence.extend(Sequence::iter(&record.sequence()));
            let supported = parse_cigar(Cigar::iter(&record.cigar()), ops)?;

            let mut status = Converted::Aligned;
            if start < 0 {
                into.drop_ops();
                status = Converted::Uninformative;
            } else if !supported {
                into.drop_ops();
                status = Converted::Unsupported;
            } else if ops.is_empty() {
                into.drop_ops();
                status = Converted::Uninformative;
            }

            if into.sequence().as_ref().map(|x| x.is_empty()).unwrap_or(true) {
                into.drop_sequence();
                if status == Converted::Aligned {
                    status = Converted::Uninformative;
                }
            }
            Ok(status)
        }
    };
}

impl_convert!(from_sam, noodles::sam::Record);
impl_convert!(from_bam, noodles::bam::Record);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_kinds() {
        for (kind, expected) in [
            (Kind::Match, Some(OpKind::Match)),
            (Kind::Insertion, Some(OpKind::Insertion)),
            (Kind::Deletion, Some(OpKind::Deletion)),
            (Kind::SoftClip, Some(OpKind::SoftClip)),
            (Kind::HardClip, Some(OpKind::HardClip)),
            (Kind::Skip, None),
            (Kind::Pad, None),
            (Kind::SequenceMatch, None),
            (Kind::SequenceMismatch, None),
        ] {
            assert_eq!(op_kind(kind), expected, "Kind: {kind:?}");
        }
    }

    #[test]
    fn test_parse_cigar() -> io::Result<()> {
        let mut ops = Vec::new();
        let cigar = [
            CigarOp::new(Kind::SoftClip, 5),
            CigarOp::new(Kind::Match, 4),
            CigarOp::new(Kind::Insertion, 2),
        ];
        assert!(parse_cigar(cigar.into_iter().map(Ok), &mut ops)?);
        assert_eq!(
            ops,
            vec![
                Op::new(OpKind::SoftClip, 5),
                Op::new(OpKind::Match, 4),
                Op::new(OpKind::Insertion, 2)
            ]
        );

        ops.clear();
        let cigar = [CigarOp::new(Kind::Match, 4), CigarOp::new(Kind::Skip, 100)];
        assert!(!parse_cigar(cigar.into_iter().map(Ok), &mut ops)?);
        Ok(())
    }
}
