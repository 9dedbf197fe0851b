use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::io::{self, Write};

pub mod error;
pub mod pool;
pub mod sampler;

pub use error::Error;
pub use pool::{build_pool, Category, SymbolPool};
pub use sampler::{generate, generate_with, EntropySource, OsEntropy, MAX_COUNT, MAX_LENGTH};

const PER_ROW: usize = 3;
const ROW_SEPARATOR: &str = "    ";

#[derive(Parser, Debug)]
#[command(
    name = "pwgen",
    version = concat!("v", env!("CARGO_PKG_VERSION")),
    about = "password generator, uses the system entropy for every run",
    disable_version_flag = true
)]
pub struct Args {
    /// password type (default standard):
    ///   num | numeric    digits only (PIN)
    ///   low | lowercase  digits and lowercase letters
    ///   upp | uppercase  digits and uppercase letters
    ///   std | standard   digits and mixed case letters
    #[clap(value_name = "TYPE", verbatim_doc_comment)]
    category: Option<Category>,

    /// password type, same as the positional TYPE
    #[clap(short = 't', long = "type", value_name = "TYPE", conflicts_with = "category")]
    type_flag: Option<Category>,

    /// password length
    #[clap(short, long, default_value_t = 12, value_parser = length_arg, env = "PWGEN_LENGTH")]
    length: usize,

    /// how many passwords to generate
    #[clap(short, long, default_value_t = 3, value_parser = count_arg, env = "PWGEN_COUNT")]
    count: usize,

    /// add special characters to the pool
    #[clap(short, long = "special-characters")]
    special: bool,

    /// remove confusing characters from the pool (l, I, O, 0, etc.)
    #[clap(short = 'S', long)]
    safe: bool,

    /// print everything on one line, space separated
    #[clap(long)]
    compact: bool,

    /// debug output on stderr
    #[clap(long)]
    pub debug: bool,

    /// show version and exit
    #[clap(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn parse_size(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("value should be a positive number, got {value}"))
}

fn length_arg(value: &str) -> Result<usize, String> {
    let length = parse_size(value)?;
    sampler::check_length(length).map_err(|e| e.to_string())?;
    Ok(length)
}

fn count_arg(value: &str) -> Result<usize, String> {
    let count = parse_size(value)?;
    sampler::check_count(count).map_err(|e| e.to_string())?;
    Ok(count)
}

/// Everything needed to produce one batch of passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub category: Category,
    pub length: usize,
    pub count: usize,
    pub include_special: bool,
    pub safe_mode: bool,
}

impl GenerationRequest {
    pub fn new(
        category: Category,
        length: usize,
        count: usize,
        include_special: bool,
        safe_mode: bool,
    ) -> Result<Self, Error> {
        sampler::check_sizes(length, count)?;
        Ok(GenerationRequest {
            category,
            length,
            count,
            include_special,
            safe_mode,
        })
    }

    pub fn pool(&self) -> SymbolPool {
        build_pool(self.category, self.include_special, self.safe_mode)
    }

    pub fn generate(&self) -> Result<Vec<String>, Error> {
        self.generate_with(&mut OsEntropy)
    }

    pub fn generate_with<E: EntropySource>(&self, source: &mut E) -> Result<Vec<String>, Error> {
        generate_with(source, &self.pool(), self.length, self.count)
    }
}

#[derive(Debug)]
pub struct PasswordGenerator {
    request: GenerationRequest,
    compact: bool,
}

impl PasswordGenerator {
    pub fn new(args: Args) -> Result<Self, Error> {
        let category = args.category.or(args.type_flag).unwrap_or(Category::Standard);
        let request = GenerationRequest::new(category, args.length, args.count, args.special, args.safe)?;
        debug!("request: {:?}", request);
        Ok(PasswordGenerator {
            request,
            compact: args.compact,
        })
    }

    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        self.write_to(&mut OsEntropy, &mut stdout.lock())
    }

    /// Generates the whole batch before writing, so a failure leaves `out` untouched.
    pub fn write_to<E: EntropySource, W: Write>(&self, source: &mut E, out: &mut W) -> Result<()> {
        let passwords = self
            .request
            .generate_with(source)
            .context("no passwords generated")?;
        writeln!(out, "{}", format_passwords(&passwords, self.compact))?;
        Ok(())
    }
}

/// Rows of three separated by four spaces, or a single space separated
/// line when `compact` is set.
pub fn format_passwords(passwords: &[String], compact: bool) -> String {
    if compact {
        return passwords.join(" ");
    }
    passwords
        .chunks(PER_ROW)
        .map(|row| row.join(ROW_SEPARATOR))
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pwgen").chain(argv.iter().copied())).unwrap()
    }

    fn to_strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_rows() {
        let pw = to_strings(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(format_passwords(&pw, false), "a    b    c\nd    e    f\ng", "rows of three");
        assert_eq!(format_passwords(&pw[..2], false), "a    b", "short last row");
        assert_eq!(format_passwords(&pw[..3], false), "a    b    c", "no trailing newline");
    }

    #[test]
    fn test_format_compact() {
        let pw = to_strings(&["a", "b", "c", "d"]);
        assert_eq!(format_passwords(&pw, true), "a b c d", "single space separated");
        assert_eq!(format_passwords(&pw[..1], true), "a", "single password");
    }

    #[test]
    fn test_request_rejects_zero() {
        assert!(matches!(
            GenerationRequest::new(Category::Numeric, 0, 1, false, false),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            GenerationRequest::new(Category::Numeric, 4, 0, false, false),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let generator = PasswordGenerator::new(args(&[])).unwrap();
        assert_eq!(
            generator.request,
            GenerationRequest::new(Category::Standard, 12, 3, false, false).unwrap()
        );
        assert!(!generator.compact);
    }

    #[test]
    fn test_category_positional_or_flag() {
        let positional = PasswordGenerator::new(args(&["num"])).unwrap();
        assert_eq!(positional.request.category, Category::Numeric);
        let flagged = PasswordGenerator::new(args(&["-t", "upp"])).unwrap();
        assert_eq!(flagged.request.category, Category::Uppercase);
        assert!(
            Args::try_parse_from(["pwgen", "num", "--type", "low"]).is_err(),
            "positional and flag conflict"
        );
    }

    #[test]
    fn test_flags() {
        let generator =
            PasswordGenerator::new(args(&["low", "-l", "20", "-c", "5", "-s", "-S", "--compact"])).unwrap();
        assert_eq!(
            generator.request,
            GenerationRequest::new(Category::Lowercase, 20, 5, true, true).unwrap()
        );
        assert!(generator.compact);
    }

    #[test]
    fn test_invalid_args() {
        assert!(Args::try_parse_from(["pwgen", "-l", "0"]).is_err(), "zero length");
        assert!(Args::try_parse_from(["pwgen", "-c", "0"]).is_err(), "zero count");
        assert!(Args::try_parse_from(["pwgen", "-l", "abc"]).is_err(), "not a number");
        assert!(Args::try_parse_from(["pwgen", "alpha"]).is_err(), "unknown type");
    }

    #[test]
    fn test_size_args() {
        assert_eq!(length_arg("12"), Ok(12));
        assert_eq!(count_arg("3"), Ok(3));
        assert!(length_arg("0").is_err(), "zero");
        assert!(length_arg("-3").is_err(), "negative");
        assert!(length_arg("1.5").is_err(), "fraction");
        assert!(length_arg("18446744073709551615").is_err(), "usize::MAX length");
        assert!(count_arg("18446744073709551615").is_err(), "usize::MAX count");
        assert!(length_arg("99999999999999999999999").is_err(), "overflows usize");
        assert_eq!(length_arg(&MAX_LENGTH.to_string()), Ok(MAX_LENGTH), "cap is inclusive");
        assert!(count_arg(&(MAX_COUNT + 1).to_string()).is_err(), "past the cap");
    }

    #[test]
    fn test_request_rejects_oversized() {
        assert!(matches!(
            GenerationRequest::new(Category::Standard, usize::MAX, 1, false, false),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            GenerationRequest::new(Category::Standard, 12, MAX_COUNT + 1, false, false),
            Err(Error::InvalidArgument(_))
        ));
    }

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&mut self, _dest: &mut [u8]) -> Result<(), Error> {
            Err(Error::EntropyUnavailable("no entropy device".to_string()))
        }
    }

    #[test]
    fn test_entropy_failure_writes_nothing() {
        let generator = PasswordGenerator::new(args(&[])).unwrap();
        let mut out = Vec::new();
        let err = generator.write_to(&mut BrokenEntropy, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("no entropy device"), "keeps the os message");
        assert!(out.is_empty(), "nothing written on failure");
    }

    #[test]
    fn test_write_numeric_pin() {
        let generator = PasswordGenerator::new(args(&["num", "-l", "4", "-c", "1"])).unwrap();
        let mut out = Vec::new();
        generator.write_to(&mut OsEntropy, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        let pin = printed.strip_suffix('\n').unwrap();
        assert_eq!(pin.len(), 4);
        assert!(pin.chars().all(|c| c.is_ascii_digit()), "{pin} is not a pin");
    }

    #[test]
    fn test_write_compact_standard() {
        let generator = PasswordGenerator::new(args(&["std", "--compact"])).unwrap();
        let mut out = Vec::new();
        generator.write_to(&mut OsEntropy, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 1, "single line");
        let tokens: Vec<&str> = printed.trim_end().split(' ').collect();
        assert_eq!(tokens.len(), 3);
        for token in tokens {
            assert_eq!(token.len(), 12);
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()), "{token} is not alphanumeric");
        }
    }
}
