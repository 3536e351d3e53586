pub mod db;
pub mod geocode;
pub mod pdf;
