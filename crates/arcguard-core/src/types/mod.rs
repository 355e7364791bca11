//! Core types shared by the validator and the extraction drivers.
//!
//! Member metadata is captured into plain records as soon as a decoder
//! yields it, so later stages never depend on decoder internals.

pub mod dest_dir;
pub mod entry_type;
pub mod member;

pub use dest_dir::ExtractRoot;
pub use entry_type::MemberType;
pub use member::MemberRecord;
pub use member::TarMember;
pub use member::ZipMember;
pub use member::ZipMethod;
