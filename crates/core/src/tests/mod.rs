//! Reusable test harnesses
