//! Pluggable calendar-date text formats

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

const ISO_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Converts dates to and from attribute text
pub trait DateFormat {
    /// `None` for text that is not a valid date in this format
    fn parse(&self, text: &str) -> Option<Date>;
    fn format(&self, date: Date) -> String;
}

/// `YYYY-MM-DD`, the format documents are written in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsoDate;

impl DateFormat for IsoDate {
    fn parse(&self, text: &str) -> Option<Date> {
        Date::parse(text, ISO_FORMAT).ok()
    }

    fn format(&self, date: Date) -> String {
        date.format(ISO_FORMAT).unwrap_or_else(|_| {
            format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            )
        })
    }
}
