/// Timestamped progress line on stderr, stdout is reserved for the JSON record.
/// Passing a starting time appends how long it took from then to now.
/// ```ignore
/// info_time!("GET {}", url);
/// let time = Local::now();
/// info_time!(time, "Fetched {}", county);
/// ```
#[macro_export]
macro_rules! info_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {{
        let local_now = ::chrono::Local::now();
        eprintln!("{:<30} : {}", local_now, format!($strfm, $($arg),*));
    }};
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {{
        let local_now = ::chrono::Local::now();
        let run_time = local_now
            .signed_duration_since($time)
            .num_milliseconds() as f64
            / 1_000.0;
        eprintln!(
            "{:<30} : {} ({:.3} sec)",
            local_now,
            format!($strfm, $($arg),*),
            run_time
        );
    }};
}
