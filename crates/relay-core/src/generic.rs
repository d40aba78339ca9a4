// SPDX-License-Identifier: Apache-2.0
//! Generic block configuration.
//!
//! Generic block kinds take their port counts from the configuration string
//! they are instantiated with (a trailing `_<n>` suffix) and synthesize
//! their interface at configuration time: numbered point names, every point
//! typed as the generic placeholder so any primitive can be wired in. A
//! configured instance owns its synthesized spec; statically shaped kinds
//! share one spec instead.

use std::sync::Arc;

use thiserror::Error;

use crate::block::BlockInstance;
use crate::connection::ConnectionHub;
use crate::interface::{DataPoint, InterfaceError, InterfaceSpec};
use crate::strings::{self, StringId};
use crate::types::TypeId;

/// Longest identifier a generated point name may occupy.
pub const MAX_IDENTIFIER_LEN: usize = 32;

/// Generic configuration failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GenericConfigError {
    /// The configuration string carries no trailing `_<n>` point count.
    #[error("configuration has no trailing `_<n>` point count")]
    MissingCount,
    /// The point count is zero or beyond three digits.
    #[error("point count must be between 1 and 999")]
    CountOutOfRange,
    /// `prefix` plus the widest index would exceed [`MAX_IDENTIFIER_LEN`].
    #[error("generated name of {prefix_len}+{digits} characters exceeds the identifier limit")]
    IdentifierTooLong {
        /// Length of the caller's prefix.
        prefix_len: usize,
        /// Digits the widest index needs.
        digits: usize,
    },
    /// Synthesized interface tables failed validation.
    #[error(transparent)]
    Interface(#[from] InterfaceError),
}

/// Extracts the point count from a configuration string's trailing `_<n>`
/// suffix.
///
/// # Errors
/// [`GenericConfigError::MissingCount`] when there is no `_` or the suffix
/// is not decimal digits; [`GenericConfigError::CountOutOfRange`] for zero
/// or more than three digits.
pub fn generic_point_count(config: &str) -> Result<usize, GenericConfigError> {
    let (_, suffix) = config
        .rsplit_once('_')
        .ok_or(GenericConfigError::MissingCount)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GenericConfigError::MissingCount);
    }
    if suffix.len() > 3 {
        return Err(GenericConfigError::CountOutOfRange);
    }
    let count: usize = suffix
        .parse()
        .map_err(|_| GenericConfigError::MissingCount)?;
    if count == 0 {
        return Err(GenericConfigError::CountOutOfRange);
    }
    Ok(count)
}

/// Generates `count` interned point names `prefix1`, `prefix2`, ...
///
/// The decimal index is maintained in a rolling byte buffer: names carry one
/// digit up to 9, two up to 99 and three up to 999, and a higher digit
/// position is rewritten only when it changes. The length check against
/// [`MAX_IDENTIFIER_LEN`] precedes generation, so a failing call interns
/// nothing.
///
/// # Errors
/// [`GenericConfigError::CountOutOfRange`] and
/// [`GenericConfigError::IdentifierTooLong`]; the latter is also logged at
/// error severity since it indicates a malformed block kind definition.
pub fn generate_point_names(
    prefix: &str,
    count: usize,
) -> Result<Vec<StringId>, GenericConfigError> {
    if count == 0 || count > 999 {
        return Err(GenericConfigError::CountOutOfRange);
    }
    let digits = match count {
        ..=9 => 1,
        ..=99 => 2,
        _ => 3,
    };
    if prefix.len() + digits > MAX_IDENTIFIER_LEN {
        tracing::error!(
            prefix,
            digits,
            limit = MAX_IDENTIFIER_LEN,
            "generated point names would exceed the identifier limit"
        );
        return Err(GenericConfigError::IdentifierTooLong {
            prefix_len: prefix.len(),
            digits,
        });
    }
    let base = prefix.len();
    let mut buf = Vec::with_capacity(base + digits);
    buf.extend_from_slice(prefix.as_bytes());
    let mut names = Vec::with_capacity(count);
    for i in 1..=count {
        match i {
            1 => buf.push(b'1'),
            10 => {
                buf.truncate(base);
                buf.extend_from_slice(b"10");
            }
            100 => {
                buf.truncate(base);
                buf.extend_from_slice(b"100");
            }
            _ => {
                let end = buf.len();
                let ones = (i % 10) as u8;
                buf[end - 1] = b'0' + ones;
                if ones == 0 {
                    let tens = (i / 10 % 10) as u8;
                    buf[end - 2] = b'0' + tens;
                    if tens == 0 {
                        buf[end - 3] = b'0' + (i / 100) as u8;
                    }
                }
            }
        }
        // The buffer is an ASCII extension of a valid str.
        names.push(strings::intern(&String::from_utf8_lossy(&buf)));
    }
    Ok(names)
}

/// Generates `count` generically typed data points named off `prefix`.
///
/// # Errors
/// See [`generate_point_names`].
pub fn generate_any_data_points(
    prefix: &str,
    count: usize,
) -> Result<Vec<DataPoint>, GenericConfigError> {
    Ok(generate_point_names(prefix, count)?
        .into_iter()
        .map(|name| DataPoint {
            name,
            ty: TypeId::Any,
        })
        .collect())
}

/// Configures a generic block instance: runs the caller's interface
/// synthesis against the configuration string, then builds the instance
/// with storage sized by the synthesized shape. On failure no instance
/// exists, so nothing half-configured can ever execute.
///
/// # Errors
/// Whatever `build_spec` reports.
pub fn configure_generic_instance<F>(
    name: &str,
    config: &str,
    hub: Arc<ConnectionHub>,
    build_spec: F,
) -> Result<BlockInstance, GenericConfigError>
where
    F: FnOnce(&str) -> Result<Arc<InterfaceSpec>, GenericConfigError>,
{
    let spec = build_spec(config)?;
    Ok(BlockInstance::new(name, spec, hub))
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolved(names: &[StringId]) -> Vec<&'static str> {
        names
            .iter()
            .map(|&id| strings::resolve(id).unwrap())
            .collect()
    }

    #[test]
    fn point_count_comes_from_the_trailing_suffix() {
        assert_eq!(generic_point_count("F_ADD_2"), Ok(2));
        assert_eq!(generic_point_count("GEN_AND_17"), Ok(17));
        assert_eq!(generic_point_count("MUX_999"), Ok(999));
    }

    #[test]
    fn point_count_fails_closed() {
        assert_eq!(
            generic_point_count("F_ADD"),
            Err(GenericConfigError::MissingCount)
        );
        assert_eq!(
            generic_point_count("F_ADD_X"),
            Err(GenericConfigError::MissingCount)
        );
        assert_eq!(
            generic_point_count("F_ADD_0"),
            Err(GenericConfigError::CountOutOfRange)
        );
        assert_eq!(
            generic_point_count("F_ADD_1000"),
            Err(GenericConfigError::CountOutOfRange)
        );
    }

    #[test]
    fn five_points_use_single_digits() {
        let names = generate_point_names("IN", 5).unwrap();
        assert_eq!(resolved(&names), ["IN1", "IN2", "IN3", "IN4", "IN5"]);
    }

    #[test]
    fn tens_digit_rolls_over_at_ten() {
        let names = generate_point_names("IN", 12).unwrap();
        let text = resolved(&names);
        assert_eq!(text[8], "IN9");
        assert_eq!(text[9], "IN10");
        assert_eq!(text[10], "IN11");
        assert_eq!(text[11], "IN12");
    }

    #[test]
    fn hundreds_digit_rolls_over_at_multiples() {
        let names = generate_point_names("QO", 210).unwrap();
        let text = resolved(&names);
        assert_eq!(text[98], "QO99");
        assert_eq!(text[99], "QO100");
        assert_eq!(text[109], "QO110");
        assert_eq!(text[199], "QO200");
        assert_eq!(text[209], "QO210");
    }

    #[test]
    fn oversized_prefix_is_rejected_before_generation() {
        let prefix = "P".repeat(MAX_IDENTIFIER_LEN);
        assert_eq!(
            generate_point_names(&prefix, 3),
            Err(GenericConfigError::IdentifierTooLong {
                prefix_len: MAX_IDENTIFIER_LEN,
                digits: 1,
            })
        );
        // One digit still fits when the prefix leaves room for it.
        let fits = "P".repeat(MAX_IDENTIFIER_LEN - 1);
        assert!(generate_point_names(&fits, 9).is_ok());
        assert!(generate_point_names(&fits, 10).is_err());
    }

    #[test]
    fn generated_data_points_are_generically_typed() {
        let points = generate_any_data_points("IN", 5).unwrap();
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.ty == TypeId::Any));
        assert_eq!(strings::resolve(points[0].name), Some("IN1"));
    }

    #[test]
    fn configure_builds_an_instance_sized_by_the_synthesized_spec() {
        use crate::interface::PortId;

        let hub = ConnectionHub::new();
        let inst = configure_generic_instance("G1", "GEN_PASS_3", hub, |config| {
            let count = generic_point_count(config)?;
            let mut builder = InterfaceSpec::builder()
                .event_input("REQ", &[0, 1, 2])
                .event_output("CNF", &[]);
            for point in generate_any_data_points("IN", count)? {
                let name = strings::resolve(point.name).unwrap();
                builder = builder.data_input(name, point.ty);
            }
            Ok(builder.build()?)
        })
        .unwrap();
        assert_eq!(inst.spec().data_input_count(), 3);
        assert_eq!(inst.data_input(PortId::new(2)), Some(&crate::Value::Any));
        assert_eq!(inst.data_input(PortId::new(3)), None);
    }

    #[test]
    fn failed_configuration_leaves_no_instance() {
        let hub = ConnectionHub::new();
        let result = configure_generic_instance("G2", "GEN_PASS", hub, |config| {
            let count = generic_point_count(config)?;
            let mut builder = InterfaceSpec::builder();
            for point in generate_any_data_points("IN", count)? {
                let name = strings::resolve(point.name).unwrap();
                builder = builder.data_input(name, point.ty);
            }
            Ok(builder.build()?)
        });
        assert_eq!(result.err(), Some(GenericConfigError::MissingCount));
    }
}
