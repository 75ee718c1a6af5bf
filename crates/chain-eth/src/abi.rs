//! Solidity ABI encoding for contract calls.
//!
//! Covers what the wallet needs to talk to gateway and wallet contracts and to
//! encode arbitrary user calls: human-readable function signatures, head/tail
//! encoding of static and dynamic values (including arrays and tuples), and
//! decoding of single-word return values.

use alloy_primitives::{Address, I256, U256};

use crate::error::EthError;
use crate::hash::selector;

/// A Solidity parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Address,
    /// `uintN`, with the bit width.
    Uint(usize),
    /// `intN`, with the bit width.
    Int(usize),
    Bool,
    /// `bytesN` for `1 <= N <= 32`.
    FixedBytes(usize),
    Bytes,
    String,
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[k]`
    FixedArray(Box<ParamType>, usize),
    /// `(T1,T2,...)`
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Parses a type as written in a human-readable signature. Parameter names
    /// and data-location keywords (`uint256 amount`, `bytes calldata data`) are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, EthError> {
        let ty = strip_param_name(text.trim());
        if ty.is_empty() {
            return Err(EthError::InvalidSignature("empty parameter type".into()));
        }

        if let Some(body) = ty.strip_suffix(']') {
            let open = body
                .rfind('[')
                .ok_or_else(|| EthError::InvalidSignature(format!("unbalanced brackets in {ty}")))?;
            let inner = Self::parse(&body[..open])?;
            let size = &body[open + 1..];
            if size.is_empty() {
                return Ok(Self::Array(Box::new(inner)));
            }
            let size: usize = size
                .parse()
                .map_err(|_| EthError::InvalidSignature(format!("bad array size in {ty}")))?;
            return Ok(Self::FixedArray(Box::new(inner), size));
        }

        // `tuple(...)` is the JSON-ABI spelling of `(...)`.
        let ty = match ty.strip_prefix("tuple") {
            Some(rest) if rest.starts_with('(') => rest,
            _ => ty,
        };
        if let Some(body) = ty.strip_prefix('(') {
            let body = body
                .strip_suffix(')')
                .ok_or_else(|| EthError::InvalidSignature(format!("unbalanced parentheses in {ty}")))?;
            let components = split_top_level(body)?
                .into_iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Tuple(components));
        }

        match ty {
            "address" => Ok(Self::Address),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::String),
            "bytes" => Ok(Self::Bytes),
            "uint" => Ok(Self::Uint(256)),
            "int" => Ok(Self::Int(256)),
            _ => {
                if let Some(bits) = ty.strip_prefix("uint") {
                    Ok(Self::Uint(parse_width(ty, bits)?))
                } else if let Some(bits) = ty.strip_prefix("int") {
                    Ok(Self::Int(parse_width(ty, bits)?))
                } else if let Some(len) = ty.strip_prefix("bytes") {
                    let len: usize = len
                        .parse()
                        .map_err(|_| EthError::InvalidSignature(format!("unsupported type {ty}")))?;
                    if len == 0 || len > 32 {
                        return Err(EthError::InvalidSignature(format!("invalid length in {ty}")));
                    }
                    Ok(Self::FixedBytes(len))
                } else {
                    Err(EthError::InvalidSignature(format!("unsupported type {ty}")))
                }
            }
        }
    }

    /// The canonical type string used when hashing a signature.
    pub fn canonical(&self) -> String {
        match self {
            Self::Address => "address".into(),
            Self::Uint(bits) => format!("uint{bits}"),
            Self::Int(bits) => format!("int{bits}"),
            Self::Bool => "bool".into(),
            Self::FixedBytes(len) => format!("bytes{len}"),
            Self::Bytes => "bytes".into(),
            Self::String => "string".into(),
            Self::Array(inner) => format!("{}[]", inner.canonical()),
            Self::FixedArray(inner, size) => format!("{}[{size}]", inner.canonical()),
            Self::Tuple(components) => {
                let parts: Vec<String> = components.iter().map(Self::canonical).collect();
                format!("({})", parts.join(","))
            }
        }
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes | Self::String | Self::Array(_) => true,
            Self::FixedArray(inner, _) => inner.is_dynamic(),
            Self::Tuple(components) => components.iter().any(Self::is_dynamic),
            _ => false,
        }
    }
}

/// A value to be ABI-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint(U256),
    /// Encoded as a sign-extended two's-complement word.
    Int(I256),
    Bool(bool),
    /// Encoded right-padded into a single word; at most 32 bytes.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<AbiValue>),
    FixedArray(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes(_) | Self::String(_) | Self::Array(_) => true,
            Self::FixedArray(items) | Self::Tuple(items) => items.iter().any(Self::is_dynamic),
            _ => false,
        }
    }

    /// Whether this value can be encoded as `ty`.
    pub fn matches(&self, ty: &ParamType) -> bool {
        match (self, ty) {
            (Self::Address(_), ParamType::Address)
            | (Self::Bool(_), ParamType::Bool)
            | (Self::Bytes(_), ParamType::Bytes)
            | (Self::String(_), ParamType::String) => true,
            (Self::Uint(value), ParamType::Uint(bits)) => value.bit_len() <= *bits,
            (Self::Int(value), ParamType::Int(bits)) => int_fits(*value, *bits),
            (Self::FixedBytes(bytes), ParamType::FixedBytes(len)) => bytes.len() == *len,
            (Self::Array(items), ParamType::Array(inner)) => items.iter().all(|v| v.matches(inner)),
            (Self::FixedArray(items), ParamType::FixedArray(inner, size)) => {
                items.len() == *size && items.iter().all(|v| v.matches(inner))
            }
            (Self::Tuple(items), ParamType::Tuple(components)) => {
                items.len() == components.len()
                    && items.iter().zip(components).all(|(v, t)| v.matches(t))
            }
            _ => false,
        }
    }
}

/// A contract function parsed from a human-readable signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<ParamType>,
}

impl Function {
    /// Parses `name(type1,type2,...)`. A leading `function` keyword, parameter
    /// names and any trailing modifiers or `returns (...)` clause are accepted
    /// and ignored.
    pub fn parse(signature: &str) -> Result<Self, EthError> {
        let text = signature.trim();
        let text = text.strip_prefix("function ").unwrap_or(text).trim_start();

        let open = text
            .find('(')
            .ok_or_else(|| EthError::InvalidSignature(format!("missing '(' in {signature}")))?;
        let name = text[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(EthError::InvalidSignature(format!("bad function name in {signature}")));
        }

        let close = matching_paren(text, open)
            .ok_or_else(|| EthError::InvalidSignature(format!("missing ')' in {signature}")))?;
        let inputs = split_top_level(&text[open + 1..close])?
            .into_iter()
            .map(ParamType::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            inputs,
        })
    }

    /// The canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let parts: Vec<String> = self.inputs.iter().map(ParamType::canonical).collect();
        format!("{}({})", self.name, parts.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        selector(&self.signature())
    }

    /// Encodes `selector || encode(args)` after checking arity and types.
    pub fn encode_input(&self, args: &[AbiValue]) -> Result<Vec<u8>, EthError> {
        if args.len() != self.inputs.len() {
            return Err(EthError::ArgumentMismatch(format!(
                "{} expects {} arguments, got {}",
                self.signature(),
                self.inputs.len(),
                args.len()
            )));
        }

        for (i, (arg, ty)) in args.iter().zip(&self.inputs).enumerate() {
            if !arg.matches(ty) {
                return Err(EthError::ArgumentMismatch(format!(
                    "argument {i} of {} is not a valid {}",
                    self.signature(),
                    ty.canonical()
                )));
            }
        }

        Ok(encode_function_call(self.selector(), args))
    }
}

/// The callable surface of a contract, built from human-readable signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAbi {
    functions: Vec<Function>,
}

impl ContractAbi {
    pub fn parse<S: AsRef<str>>(signatures: &[S]) -> Result<Self, EthError> {
        let functions = signatures
            .iter()
            .map(|s| Function::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { functions })
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Looks up a function by bare name or by full signature. Bare names must
    /// identify exactly one function.
    pub fn function(&self, method: &str) -> Result<&Function, EthError> {
        if method.contains('(') {
            let wanted = Function::parse(method)?.signature();
            return self
                .functions
                .iter()
                .find(|f| f.signature() == wanted)
                .ok_or(EthError::UnknownFunction(wanted));
        }

        let mut candidates = self.functions.iter().filter(|f| f.name == method);
        match (candidates.next(), candidates.next()) {
            (Some(function), None) => Ok(function),
            (Some(_), Some(_)) => Err(EthError::AmbiguousFunction(method.to_string())),
            (None, _) => Err(EthError::UnknownFunction(method.to_string())),
        }
    }

    pub fn encode_function_data(&self, method: &str, args: &[AbiValue]) -> Result<Vec<u8>, EthError> {
        self.function(method)?.encode_input(args)
    }
}

/// Encodes a function call as `selector || encode(args)`.
pub fn encode_function_call(selector: [u8; 4], args: &[AbiValue]) -> Vec<u8> {
    let body = encode(args);
    let mut data = Vec::with_capacity(4 + body.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&body);
    data
}

/// ABI-encodes a list of values as a tuple (the layout of call arguments).
pub fn encode(values: &[AbiValue]) -> Vec<u8> {
    let head_len: usize = values.iter().map(head_size).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for value in values {
        if value.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend_from_slice(&encode_value(value));
        } else {
            head.extend_from_slice(&encode_value(value));
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Splits raw bytes into 32-byte big-endian words.
///
/// Aggregate-signature public keys and signatures are handed to the gateway as
/// fixed arrays of `uint256`; the input length must be a multiple of 32.
pub fn split_words(bytes: &[u8]) -> Result<Vec<U256>, EthError> {
    if bytes.is_empty() || bytes.len() % 32 != 0 {
        return Err(EthError::EncodingError(format!(
            "expected a non-empty multiple of 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes.chunks_exact(32).map(U256::from_be_slice).collect())
}

/// Decodes an `address` from the first word of `data`.
pub fn decode_address(data: &[u8]) -> Result<Address, EthError> {
    let word = first_word(data)?;
    if word[..12].iter().any(|&b| b != 0) {
        return Err(EthError::DecodingError("address word has dirty high bytes".into()));
    }
    Ok(Address::from_slice(&word[12..]))
}

/// Decodes a `uint256` from the first word of `data`.
pub fn decode_uint(data: &[u8]) -> Result<U256, EthError> {
    first_word(data).map(U256::from_be_slice)
}

fn first_word(data: &[u8]) -> Result<&[u8], EthError> {
    data.get(..32).ok_or_else(|| {
        EthError::DecodingError(format!("expected at least 32 bytes, got {}", data.len()))
    })
}

/// Size of a value's slot in the head section.
fn head_size(value: &AbiValue) -> usize {
    if value.is_dynamic() {
        return 32;
    }
    match value {
        AbiValue::FixedArray(items) | AbiValue::Tuple(items) => items.iter().map(head_size).sum(),
        _ => 32,
    }
}

fn encode_value(value: &AbiValue) -> Vec<u8> {
    match value {
        AbiValue::Address(addr) => {
            // Left-pad: 12 zero bytes + 20 address bytes.
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr.as_slice());
            word.to_vec()
        }
        AbiValue::Uint(v) => v.to_be_bytes::<32>().to_vec(),
        AbiValue::Int(v) => v.into_raw().to_be_bytes::<32>().to_vec(),
        AbiValue::Bool(b) => usize_word(usize::from(*b)).to_vec(),
        AbiValue::FixedBytes(bytes) => {
            let mut word = [0u8; 32];
            let len = bytes.len().min(32);
            word[..len].copy_from_slice(&bytes[..len]);
            word.to_vec()
        }
        AbiValue::Bytes(bytes) => encode_dynamic_bytes(bytes),
        AbiValue::String(s) => encode_dynamic_bytes(s.as_bytes()),
        AbiValue::Array(items) => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend_from_slice(&encode(items));
            out
        }
        AbiValue::FixedArray(items) | AbiValue::Tuple(items) => encode(items),
    }
}

/// Length word followed by the data right-padded to a word boundary.
fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
    let padded = bytes.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(32 + padded);
    out.extend_from_slice(&usize_word(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(32 + padded, 0);
    out
}

fn parse_width(ty: &str, bits: &str) -> Result<usize, EthError> {
    let bits: usize = bits
        .parse()
        .map_err(|_| EthError::InvalidSignature(format!("unsupported type {ty}")))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(EthError::InvalidSignature(format!("invalid width in {ty}")));
    }
    Ok(bits)
}

/// Whether `value` lies in `[-2^(bits-1), 2^(bits-1))`.
fn int_fits(value: I256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let raw = value.into_raw();
    let magnitude = if value.is_negative() { !raw } else { raw };
    (magnitude >> (bits - 1)).is_zero()
}

fn usize_word(n: usize) -> [u8; 32] {
    U256::from(n).to_be_bytes::<32>()
}

/// Strips a trailing parameter name or data-location keyword, keeping the
/// first whitespace-separated token outside any parentheses.
fn strip_param_name(text: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => return &text[..i],
            _ => {}
        }
    }
    text
}

/// Splits on commas that are not nested inside parentheses.
fn split_top_level(text: &str) -> Result<Vec<&str>, EthError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| EthError::InvalidSignature(format!("unbalanced parentheses in {text}")))?;
            }
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(EthError::InvalidSignature(format!("unbalanced parentheses in {text}")));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
