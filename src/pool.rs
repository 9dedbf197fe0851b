use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::debug;

// q and Q are left out of every letter group, safe or not.
const DIGITS: &str = "1234567890";
const DIGITS_SAFE: &str = "123456789";
const LOWERCASE: &str = "abcdefghijklmnoprstuvwxyz";
const LOWERCASE_SAFE: &str = "abcdefghijkmnoprstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPRSTUVWXYZ";
const UPPERCASE_SAFE: &str = "ABCDEFGHJKLMNPRSTUVWXYZ";
const SPECIAL: &str = "!@#$%^&*()";

/// Which families of characters a password draws from.
/// Digits are part of every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Numeric,
    Lowercase,
    Uppercase,
    Standard,
}

impl Category {
    const ALIASES: [(&'static str, Category); 8] = [
        ("num", Category::Numeric),
        ("numeric", Category::Numeric),
        ("low", Category::Lowercase),
        ("lowercase", Category::Lowercase),
        ("upp", Category::Uppercase),
        ("uppercase", Category::Uppercase),
        ("std", Category::Standard),
        ("standard", Category::Standard),
    ];

    fn has_lowercase(self) -> bool {
        matches!(self, Category::Lowercase | Category::Standard)
    }

    fn has_uppercase(self) -> bool {
        matches!(self, Category::Uppercase | Category::Standard)
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == wanted)
            .map(|(_, category)| *category)
            .ok_or_else(|| format!("unsupported password type: {s} (expected num, low, upp or std)"))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Category::Numeric => "numeric",
                Category::Lowercase => "lowercase",
                Category::Uppercase => "uppercase",
                Category::Standard => "standard",
            }
        )
    }
}

/// The symbols a password may be drawn from, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPool(Vec<char>);

impl SymbolPool {
    pub fn symbols(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }
}

impl Display for SymbolPool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().collect::<String>())
    }
}

pub fn build_pool(category: Category, include_special: bool, safe_mode: bool) -> SymbolPool {
    let pick = |normal: &'static str, safe: &'static str| if safe_mode { safe } else { normal };

    let mut symbols: Vec<char> = pick(DIGITS, DIGITS_SAFE).chars().collect();
    if category.has_lowercase() {
        symbols.extend(pick(LOWERCASE, LOWERCASE_SAFE).chars());
    }
    if category.has_uppercase() {
        symbols.extend(pick(UPPERCASE, UPPERCASE_SAFE).chars());
    }
    if include_special {
        symbols.extend(SPECIAL.chars());
    }
    debug!(
        "built {} pool (special: {}, safe: {}) with {} symbols",
        category,
        include_special,
        safe_mode,
        symbols.len()
    );
    SymbolPool(symbols)
}
