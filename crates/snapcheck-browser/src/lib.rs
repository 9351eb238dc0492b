// Headless Chrome driving for one-shot page verification

mod chrome_finder;
mod error;
mod session;

pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use session::{BrowserSession, SessionOptions};
