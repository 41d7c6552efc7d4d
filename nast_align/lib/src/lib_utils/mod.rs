pub mod coverage;
pub mod decode;
pub mod error;
pub mod hits;
pub mod nast;
pub mod reconcile;
pub mod struct_helper;
pub mod template;
pub mod trim;
pub mod vsearch;

pub(crate) const GAP: u8 = b'-';
const DNA_ALIGNMENT_NOTATIONS: &[u8] = b"-.";

pub(crate) fn is_gap(b: u8) -> bool {
    DNA_ALIGNMENT_NOTATIONS.contains(&b)
}
