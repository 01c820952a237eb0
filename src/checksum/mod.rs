pub mod change_gate;

pub use change_gate::{
    Digest, FOOTER_LEN, FOOTER_TAG, GateDecision, ZERO_DIGEST, digest, encode_digest, footer_line,
    parse_footer, previous_digest, should_regenerate,
};
