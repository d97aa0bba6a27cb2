//! Solvers for scalar conservation laws `u_t + J(u)_x = 0`.

pub mod lax_friedrichs;
