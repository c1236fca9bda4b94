/*

CLI client for a currency exchange rate service

USAGE:
    fxfetch --from USD --to EUR --date 2025-06-01
    fxfetch --from USD --to EUR --start-date 2025-01-01 --end-date 2025-03-01 --num-dates 5

Single mode runs one query and aborts the process on the first failure.
Batch mode samples evenly spaced dates between start and end and keeps
going when one date fails; each failure is reported and the remaining
dates are still attempted.

successful responses are saved under data/ as FROM_TO_DATE.json
errors are appended to error.log and echoed to the console
*/
use std::path::{Path, PathBuf};

use chrono::naive::NaiveDate;
use structopt::StructOpt;

mod client;
mod output;
mod types;
mod validate;

use output::Logger;
use types::{FetchError, FetchResult, Opt, ServiceCall};

const DATA_DIR: &str = "data";
const ERROR_LOG: &str = "error.log";

/*
 * Drives the per-query pipeline: validate, request, persist. Owns the run
 * configuration and the event log; the service call is injected so tests
 * can push canned envelopes through the whole pipeline.
 */
pub struct Runner {
    base_url: String,
    api_key: String,
    out_dir: PathBuf,
    warn_outside_range: bool,
    log: Logger,
    service: ServiceCall,
}

impl Runner {
    pub fn new(opt: &Opt, log: Logger, service: ServiceCall) -> Runner {
        Runner {
            base_url: opt.base_url.clone(),
            api_key: opt.api_key.clone(),
            out_dir: PathBuf::from(DATA_DIR),
            warn_outside_range: opt.warn_outside_range,
            log,
            service,
        }
    }

    /*
     * Mode dispatch: any batch flag selects batch mode. An error returned
     * from here is terminal for the process; per-date batch failures are
     * contained inside run_batch.
     */
    pub fn run(&mut self, opt: &Opt) -> FetchResult<()> {
        if opt.start_date.is_some() || opt.end_date.is_some() || opt.num_dates.is_some() {
            self.run_batch(opt)
        } else {
            self.run_single(opt)
        }
    }

    fn run_single(&mut self, opt: &Opt) -> FetchResult<()> {
        let (from, to, date_str) = match (&opt.currency_from, &opt.currency_to, &opt.date) {
            (Some(from), Some(to), Some(date)) => (from.as_str(), to.as_str(), date.as_str()),
            _ => {
                return Err(FetchError::InvalidArgument(
                    "Provide --from, --to, and --date (YYYY-MM-DD)".to_string(),
                ))
            }
        };
        let date = validate::parse_date(date_str, "date")?;
        self.run_one(from, to, date)?;
        Ok(())
    }

    /*
     * Batch mode: the argument group and the date range are validated up
     * front, before any network traffic. After that every sampled date
     * runs the normal pipeline and a failing date only costs itself.
     */
    fn run_batch(&mut self, opt: &Opt) -> FetchResult<()> {
        let (from, to, start, end, num_dates) = match (
            &opt.currency_from,
            &opt.currency_to,
            &opt.start_date,
            &opt.end_date,
            opt.num_dates,
        ) {
            (Some(from), Some(to), Some(start), Some(end), Some(n)) => {
                (from.as_str(), to.as_str(), start.as_str(), end.as_str(), n)
            }
            _ => {
                return Err(FetchError::InvalidArgument(
                    "For batch mode provide --from, --to, --start-date, --end-date, --num-dates"
                        .to_string(),
                ))
            }
        };
        let start = validate::parse_date(start, "start-date")?;
        let end = validate::parse_date(end, "end-date")?;
        let dates = validate::evenly_spaced_dates(start, end, num_dates)?;

        println!(
            "Batch: {}/{} {}..{} in {} steps",
            from,
            to,
            start,
            end,
            dates.len()
        );
        let mut saved = 0;
        for date in &dates {
            match self.run_one(from, to, *date) {
                Ok(_) => saved += 1,
                Err(err) => {
                    self.log.error(&format!("{}: {}", date, err));
                    eprintln!("✗ {}: {}", date, err);
                }
            }
        }
        self.log.info(&format!(
            "Batch finished: saved {} of {} dates for {}/{}",
            saved,
            dates.len(),
            from,
            to
        ));
        Ok(())
    }

    /*
     * One query through all stages: validate currencies, warn about the
     * advised range if asked, build and announce the URL, call the
     * service, persist the envelope. Returns the saved path.
     */
    fn run_one(&mut self, from_raw: &str, to_raw: &str, date: NaiveDate) -> FetchResult<PathBuf> {
        let from = validate::validate_currency(from_raw, "From")?;
        let to = validate::validate_currency(to_raw, "To")?;
        let date_str = date.format("%F").to_string();

        if self.warn_outside_range && validate::outside_advised_range(date) {
            println!(
                "⚠ {} is outside the suggested data range {}..{}",
                date_str,
                validate::ADVISED_MIN,
                validate::ADVISED_MAX
            );
        }

        let url = client::build_url(&self.base_url, &from, &to, Some(&date_str));
        println!("→ Requesting: {}", url);
        let payload = (self.service)(&url, &self.api_key)?;

        let path = output::save_envelope(&self.out_dir, &from, &to, &date_str, &payload)?;
        println!("✓ Saved to {}", path.display());
        Ok(path)
    }
}

fn main() {
    let opt = Opt::from_args();

    let log = match Logger::open(Path::new(ERROR_LOG)) {
        Ok(log) => log,
        Err(err) => {
            eprintln!("✗ {}", err);
            std::process::exit(1);
        }
    };

    let mut runner = Runner::new(&opt, log, client::call_service);
    if let Err(err) = runner.run(&opt) {
        runner.log.error(&err.to_string());
        eprintln!("✗ {}", err);
        //process::exit skips Drop, flush by hand
        runner.log.flush();
        std::process::exit(1);
    }
}
