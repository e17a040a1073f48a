pub mod job;
pub mod scrape_run;
pub mod source;
