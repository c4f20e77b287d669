use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("invalid {what}: {token:?}")]
    InvalidToken { what: &'static str, token: String },
    #[error("portal {portal} has a negative modulus {modulus}")]
    NegativeModulus { portal: usize, modulus: i64 },
    #[error("destination {destination} is outside 1..={nodes}")]
    DestinationOutOfRange { destination: i64, nodes: usize },
    #[error("query node {node} is outside 1..={nodes}")]
    NodeOutOfRange { node: i64, nodes: usize },
}
