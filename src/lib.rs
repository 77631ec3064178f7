//! 2-D incompressible fluid simulation with passive dye transport.
//!
//! The solver advances dye and velocity fields on a square grid using
//! source injection, implicit diffusion, semi-Lagrangian advection and
//! pressure projection, after Jos Stam's scheme in "Real-Time Fluid
//! Dynamics for Games" (2003). Every stage is unconditionally stable, so
//! the simulation never blows up regardless of timestep or impulse
//! strength.

pub mod d2;
