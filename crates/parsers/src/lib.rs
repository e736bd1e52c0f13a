mod signal;
mod temperature;

pub use signal::SignalParser;
pub use temperature::TemperatureParser;
