//! Request and response lines of the `:r` / `:w` protocol.
//!
//! ```text
//! get  -> :r23=0.            <- :r23=100000,0.
//! set  -> :w21=4.            <- :ok
//! ```
//!
//! The register number is always two zero-padded digits and at least one
//! argument follows `=`. The codec never retries; any frame that does not
//! match is reported immediately.

use fgen_core::{FgenError, FgenResult};

/// Acknowledgment of a successful set.
pub const ACK: &str = ":ok";

/// Argument sent with a get that needs none.
const GET_DEFAULT_ARGS: &[i64] = &[0];

/// Highest register number that fits the two-digit field.
pub const MAX_ADDRESS: u8 = 99;

/// Decoded payload of a get response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// One value
    Scalar(i64),
    /// Two or more values, in wire order
    Tuple(Vec<i64>),
}

impl Reply {
    fn from_values(mut values: Vec<i64>) -> Self {
        if values.len() == 1 {
            Self::Scalar(values.remove(0))
        } else {
            Self::Tuple(values)
        }
    }

    /// All values in wire order.
    pub fn values(&self) -> &[i64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::Tuple(vs) => vs,
        }
    }

    /// The value of a single-value register.
    pub fn scalar(&self) -> FgenResult<i64> {
        match self {
            Self::Scalar(v) => Ok(*v),
            Self::Tuple(vs) => Err(FgenError::UnexpectedArity {
                expected: 1,
                values: vs.clone(),
            }),
        }
    }

    /// The values of a two-value register.
    pub fn pair(&self) -> FgenResult<(i64, i64)> {
        match self.values() {
            [a, b] => Ok((*a, *b)),
            other => Err(FgenError::UnexpectedArity {
                expected: 2,
                values: other.to_vec(),
            }),
        }
    }
}

fn check_address(address: u8) -> FgenResult<()> {
    if address > MAX_ADDRESS {
        return Err(FgenError::invalid_argument(format!(
            "register {address} does not fit two digits"
        )));
    }
    Ok(())
}

fn join_args(args: &[i64]) -> String {
    args.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Build a get request. An empty argument list is sent as a single `0`.
pub fn encode_get(address: u8, args: &[i64]) -> FgenResult<String> {
    check_address(address)?;
    let args = if args.is_empty() { GET_DEFAULT_ARGS } else { args };
    Ok(format!(":r{:02}={}.", address, join_args(args)))
}

/// Build a set request. At least one argument is required.
pub fn encode_set(address: u8, args: &[i64]) -> FgenResult<String> {
    check_address(address)?;
    if args.is_empty() {
        return Err(FgenError::invalid_argument(format!(
            "set of register {address:02} without a value"
        )));
    }
    Ok(format!(":w{:02}={}.", address, join_args(args)))
}

/// Validate a get response for `address` and parse its values.
///
/// `request` is only used for error context.
pub fn decode_get_response(address: u8, request: &str, line: &str) -> FgenResult<Reply> {
    let malformed = || FgenError::MalformedResponse {
        request: request.to_string(),
        response: line.to_string(),
    };

    let body = line
        .strip_prefix(":r")
        .and_then(|rest| rest.strip_suffix('.'))
        .ok_or_else(malformed)?;
    let (echoed, payload) = body.split_once('=').ok_or_else(malformed)?;

    let echoed: u8 = echoed.parse().map_err(|_| malformed())?;
    if echoed != address {
        return Err(FgenError::ProtocolMismatch {
            request: request.to_string(),
            response: line.to_string(),
        });
    }

    let values = payload
        .split(',')
        .map(str::parse::<i64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;

    Ok(Reply::from_values(values))
}

/// Check that a set was acknowledged.
pub fn decode_set_response(request: &str, line: &str) -> FgenResult<()> {
    if line == ACK {
        Ok(())
    } else {
        Err(FgenError::NotAcknowledged {
            request: request.to_string(),
            response: line.to_string(),
        })
    }
}
