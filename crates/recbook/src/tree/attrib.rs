//! Typed attribute reads and writes

use time::Date;

use super::date::DateFormat;
use super::node::ElementNode;
use super::version::Version;

/// Outcome of a typed attribute read
#[derive(Clone, Debug, PartialEq)]
pub enum AttribLookup<T> {
    NotFound,
    /// Present but not parseable as the requested type
    Invalid,
    Found(T),
}

impl<T> AttribLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Invalid => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AttribLookup<U> {
        match self {
            Self::NotFound => AttribLookup::NotFound,
            Self::Invalid => AttribLookup::Invalid,
            Self::Found(value) => AttribLookup::Found(f(value)),
        }
    }
}

/// A type with a canonical attribute text form
pub trait AttribValue: Sized {
    fn from_attrib(text: &str) -> Option<Self>;
    fn to_attrib(&self) -> String;
}

impl AttribValue for String {
    fn from_attrib(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn to_attrib(&self) -> String {
        self.clone()
    }
}

/// Booleans are written `y`/`n`; nothing else reads back
impl AttribValue for bool {
    fn from_attrib(text: &str) -> Option<Self> {
        match text {
            "y" => Some(true),
            "n" => Some(false),
            _ => None,
        }
    }

    fn to_attrib(&self) -> String {
        if *self { "y" } else { "n" }.to_string()
    }
}

macro_rules! integer_attrib {
    ($($ty:ty),*) => {
        $(
            impl AttribValue for $ty {
                fn from_attrib(text: &str) -> Option<Self> {
                    text.parse().ok()
                }

                fn to_attrib(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_attrib!(i16, u16, i32, u32);

impl AttribValue for f64 {
    fn from_attrib(text: &str) -> Option<Self> {
        parse_f64(text)
    }

    fn to_attrib(&self) -> String {
        format_f64(*self, DEFAULT_PRECISION)
    }
}

impl AttribValue for Version {
    fn from_attrib(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn to_attrib(&self) -> String {
        self.to_string()
    }
}

/// Fractional digits used when no precision is given
pub const DEFAULT_PRECISION: usize = 2;

/// Locale-independent number text, rounded to `precision` digits with
/// trailing zeros trimmed. At precision 2 the result is either an integer
/// or has exactly two fractional digits.
pub fn format_f64(value: f64, precision: usize) -> String {
    let mut text = format!("{value:.precision$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
        if precision == 2 {
            if let Some((_, fraction)) = text.split_once('.') {
                if fraction.len() == 1 {
                    text.push('0');
                }
            }
        }
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

/// Full-string parse; empty, partial and non-finite text is rejected
pub fn parse_f64(text: &str) -> Option<f64> {
    let well_formed = !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    if !well_formed {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl ElementNode {
    /// Read and convert an attribute
    pub fn get_attrib<T: AttribValue>(&self, name: &str) -> AttribLookup<T> {
        match self.attrib(name) {
            None => AttribLookup::NotFound,
            Some(text) => T::from_attrib(text).map_or(AttribLookup::Invalid, AttribLookup::Found),
        }
    }

    pub fn get_attrib_date(&self, name: &str, dates: &dyn DateFormat) -> AttribLookup<Date> {
        match self.attrib(name) {
            None => AttribLookup::NotFound,
            Some(text) => dates
                .parse(text)
                .map_or(AttribLookup::Invalid, AttribLookup::Found),
        }
    }

    /// Write an attribute in its canonical form
    pub fn add_attrib_value<T: AttribValue>(&mut self, name: &str, value: &T) -> bool {
        self.add_attrib(name, value.to_attrib())
    }

    pub fn add_attrib_f64(&mut self, name: &str, value: f64, precision: usize) -> bool {
        self.add_attrib(name, format_f64(value, precision))
    }

    pub fn add_attrib_date(&mut self, name: &str, date: Date, dates: &dyn DateFormat) -> bool {
        self.add_attrib(name, dates.format(date))
    }
}
