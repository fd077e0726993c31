use chrono::NaiveDate;
use url::Url;

/// USNO date format: zero-padded month, unpadded day, e.g. `01/5/2024`.
pub fn format_query_date(date: NaiveDate) -> String {
    date.format("%m/%-d/%Y").to_string()
}

/// Build the outbound "one day" URL for `city` on `date`.
///
/// Any query already present on `base` is replaced by `date` and `loc`.
pub fn build_url(base: &Url, date: NaiveDate, city: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("date", &format_query_date(date))
        .append_pair("loc", city);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://api.usno.navy.mil/rstt/oneday").unwrap()
    }

    #[test]
    fn day_is_not_padded_but_month_is() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_query_date(date), "01/5/2024");

        let date = NaiveDate::from_ymd_opt(2024, 11, 25).unwrap();
        assert_eq!(format_query_date(date), "11/25/2024");
    }

    #[test]
    fn encodes_date_and_location() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let url = build_url(&base(), date, "Austin, TX");

        assert_eq!(
            url.as_str(),
            "http://api.usno.navy.mil/rstt/oneday?date=01%2F5%2F2024&loc=Austin%2C+TX"
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("date".to_string(), "01/5/2024".to_string()),
                ("loc".to_string(), "Austin, TX".to_string()),
            ]
        );
    }

    #[test]
    fn replaces_existing_query() {
        let base = Url::parse("http://localhost:9000/rstt/oneday?loc=Nowhere").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let url = build_url(&base, date, "Seattle, WA");
        assert_eq!(url.query(), Some("date=03%2F10%2F2024&loc=Seattle%2C+WA"));
    }
}
