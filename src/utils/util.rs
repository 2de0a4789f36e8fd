use crate::{
    constants::{EXIT_FAILURE, EXIT_PARSE_ERROR},
    error::{MapGwasError, MapGwasResult},
};
use log;
use std::fmt::{Binary, Display};

pub type Result<T> = MapGwasResult<T>;

#[cfg(test)]
static INIT_LOG: std::sync::Once = std::sync::Once::new();

#[cfg(test)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();
    });
}

pub fn exit_code(err: &MapGwasError) -> i32 {
    if err.is_parse_error() {
        EXIT_PARSE_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn handle_error_and_exit(err: MapGwasError) -> ! {
    if err.is_parse_error() {
        log::error!("Malformed input: {err}");
    } else {
        log::error!("{err}");
    }
    std::process::exit(exit_code(&err));
}

pub fn format_number_with_commas<T>(n: T) -> String
where
    T: Display + Binary,
{
    let s = n.to_string();
    let (sign, digits) = s.strip_prefix('-').map_or(("", s.as_str()), |d| ("-", d));

    if let 0..=3 = digits.len() {
        return s;
    }

    let mut result = String::with_capacity(digits.len() + (digits.len() - 1) / 3 + sign.len());
    for (digit_count, c) in digits.chars().rev().enumerate() {
        if digit_count > 0 && digit_count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result = result.chars().rev().collect();
    if !sign.is_empty() {
        result.insert_str(0, sign);
    }

    result
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_with_commas_u64() {
        assert_eq!(format_number_with_commas(0u64), "0");
        assert_eq!(format_number_with_commas(999u64), "999");
        assert_eq!(format_number_with_commas(1_000_000u64), "1,000,000");
        assert_eq!(
            format_number_with_commas(u64::MAX),
            "18,446,744,073,709,551,615"
        );
    }

    #[test]
    fn test_format_number_with_commas_negative() {
        assert_eq!(format_number_with_commas(-1_000i32), "-1,000");
        assert_eq!(format_number_with_commas(i32::MIN), "-2,147,483,648");
    }

    #[test]
    fn test_format_number_with_commas_usize() {
        assert_eq!(format_number_with_commas(1_234usize), "1,234");
        assert_eq!(
            format_number_with_commas(1_234_567_890usize),
            "1,234,567,890"
        );
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(3, 3), 100.0);
    }

    #[test]
    fn test_exit_code_by_error_class() {
        let parse = MapGwasError::parse("in.vcf", 3, "bad header");
        assert_eq!(exit_code(&parse), EXIT_PARSE_ERROR);

        let missing = MapGwasError::MissingCatalogColumns {
            path: "gwas.tsv".into(),
            missing: vec!["CHR_ID".to_string()],
        };
        assert_eq!(exit_code(&missing), EXIT_PARSE_ERROR);

        let io = MapGwasError::OutputNotWritable {
            path: "out".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(exit_code(&io), EXIT_FAILURE);
        assert_ne!(exit_code(&io), 0);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html("<b>\"A&B\"</b> 'x'"),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt; &#39;x&#39;"
        );
    }
}
