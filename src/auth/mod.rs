// Authentication: bearer tokens carrying the principal and its capabilities

pub mod jwt;
