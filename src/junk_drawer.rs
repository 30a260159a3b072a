use chrono::{DateTime, Local};

pub fn local_time_to_string(datetime: &DateTime<Local>) -> String {
    // Format the datetime as a string, e.g. "2021-01-01 12:00:00"
    // The default datetime.to_string() call includes fractional seconds
    // and the timezone, which we don't want.
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests
{
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn drops_fractions_and_timezone()
    {
        let datetime = Local.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(local_time_to_string(&datetime), "2021-01-01 12:00:00");
    }
}
