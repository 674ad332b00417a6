//! Snapshot header records.
//!
//! The second text line of every snapshot payload names the variable, the
//! refinement level and the simulation time:
//!
//! ```text
//! variable ham, level 5, time  1.012500000e+01
//! ```

use std::str::FromStr;

use crate::util::{Error, Result};

/// Separator between the three header fields.
const FIELD_SEPARATOR: &str = ", ";

/// Parsed snapshot header.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderRecord {
    /// Variable stored in the snapshot (`ham` above).
    pub variable_name: String,
    /// Level description; informational only, never used for filtering.
    pub level_tag: String,
    /// Simulation time of the snapshot.
    pub time: f64,
}

impl HeaderRecord {
    /// Parse a header line.
    ///
    /// The line is split on `", "` into exactly three fields. The leading
    /// word of each field (`variable`, `level`, `time`) is discarded; the
    /// remainder of the last field must be a finite float. A level field
    /// without a space is kept whole.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end();
        let fields: Vec<&str> = line.splitn(3, FIELD_SEPARATOR).collect();
        let &[var_field, level_field, time_field] = &fields[..] else {
            return Err(Error::malformed(line, "expected 3 comma-separated fields"));
        };

        let variable_name = var_field
            .splitn(3, ' ')
            .nth(1)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::malformed(line, "missing variable name"))?;

        // The level description is opaque; only a leading keyword is dropped.
        let level_tag = level_field.split_once(' ').map_or(level_field, |(_, rest)| rest);

        let (_, time_str) = time_field
            .split_once(' ')
            .ok_or_else(|| Error::malformed(line, "missing time value"))?;
        let time = time_str
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::malformed(line, format!("invalid time {:?}: {}", time_str.trim(), e)))?;
        if !time.is_finite() {
            return Err(Error::malformed(line, format!("time {} is not finite", time)));
        }

        Ok(Self {
            variable_name: variable_name.to_string(),
            level_tag: level_tag.to_string(),
            time,
        })
    }
}

impl FromStr for HeaderRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for HeaderRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "variable {}, level {}, time {:e}", self.variable_name, self.level_tag, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_header() {
        let h = HeaderRecord::parse("variable ham, level 5, time  1.012500000e+01").unwrap();
        assert_eq!(h.variable_name, "ham");
        assert_eq!(h.level_tag, "5");
        assert_eq!(h.time, 10.125);
    }

    #[test]
    fn test_parse_trailing_whitespace() {
        let h: HeaderRecord = "variable psi4, level 0, time 0.0\r\n".parse().unwrap();
        assert_eq!(h.variable_name, "psi4");
        assert_eq!(h.time, 0.0);
    }

    #[test]
    fn test_time_field_keeps_remainder() {
        // Only two splits: a stray ", " inside the time field breaks the float.
        let err = HeaderRecord::parse("variable a, level 1, time 2.0, extra").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { .. }));
    }

    #[test]
    fn test_level_without_keyword_kept_whole() {
        let h = HeaderRecord::parse("variable ham, level5, time 1.0").unwrap();
        assert_eq!(h.variable_name, "ham");
        assert_eq!(h.level_tag, "level5");
        assert_eq!(h.time, 1.0);

        let h = HeaderRecord::parse("variable ham, , time 2.0").unwrap();
        assert_eq!(h.level_tag, "");
    }

    #[test]
    fn test_malformed_headers() {
        for line in [
            "",
            "variable ham",
            "variable ham, level 5",
            "variable, level 5, time 1.0",
            "variable ham, level 5, time",
            "variable ham, level 5, time abc",
            "variable ham, level 5, time NaN",
            "variable ham, level 5, time inf",
            "variable ham, level 5, time -infinity",
        ] {
            let result = HeaderRecord::parse(line);
            assert!(
                matches!(result, Err(Error::MalformedHeader { .. })),
                "{:?} should be rejected",
                line
            );
        }
    }

    #[test]
    fn test_display_roundtrips() {
        let h = HeaderRecord::parse("variable rho, level 2, time 1.5").unwrap();
        assert_eq!(HeaderRecord::parse(&h.to_string()).unwrap(), h);
    }
}
