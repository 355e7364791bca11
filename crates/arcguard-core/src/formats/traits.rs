//! Seams between container decoders and the validator.

use crate::Result;
use crate::types::MemberRecord;

/// Read access to the metadata of a decoded member.
pub trait MemberView {
    /// Decoder-neutral metadata.
    fn record(&self) -> &MemberRecord;

    /// Consumes the member, keeping only its metadata.
    fn into_record(self) -> MemberRecord;
}

impl MemberView for MemberRecord {
    fn record(&self) -> &MemberRecord {
        self
    }

    fn into_record(self) -> MemberRecord {
        self
    }
}

/// A lazy, ordered sequence of archive members.
///
/// Tar sources yield members that still hold their data stream; zip sources
/// yield plain records and are asked to extract by index.
pub trait MemberSource {
    /// Member type produced by this source.
    type Member: MemberView;

    /// Produces the next member, `None` once the archive is exhausted.
    fn next_member(&mut self) -> Option<Result<Self::Member>>;
}
