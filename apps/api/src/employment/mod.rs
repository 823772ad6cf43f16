// Employment history helpers: total experience and current/past split.

pub mod experience;
