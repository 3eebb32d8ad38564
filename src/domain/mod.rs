// Domain layer - Pure types and algorithms, no I/O
pub mod chart;
pub mod clock;
pub mod duty_cycle;
pub mod sample;
pub mod smoother;
pub mod stats;
pub mod watchdog;
