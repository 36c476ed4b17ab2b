/// Number of interrupt vectors routed by the environment's dispatch table.
pub const ISR_COUNT: usize = 4;
