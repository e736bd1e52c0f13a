mod scanner;

pub use scanner::LineScanner;
