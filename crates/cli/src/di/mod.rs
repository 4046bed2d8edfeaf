mod dns;
mod jobs;
mod repositories;
mod use_cases;

pub use dns::DnsServices;
pub use jobs::build_job_runner;
pub use repositories::Repositories;
pub use use_cases::UseCases;
