use crate::cli::Config;
use common::error::Error;

pub trait UseCaseRunner {
    fn run(&mut self, config: Config) -> Result<i32, Error>;
}
