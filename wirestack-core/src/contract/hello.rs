//! `hello` namespace

use super::{Procedure, ProcedureKind, Query};

/// Greeting returned by `hello.world`
pub const HELLO_WORLD_MESSAGE: &str = "Hello World from the user router!";

/// `hello.world`: no input, returns [`HELLO_WORLD_MESSAGE`]
pub struct World;

impl Procedure for World {
    const PATH: &'static str = "hello.world";
    const KIND: ProcedureKind = ProcedureKind::Query;

    type Input = ();
    type Output = String;
}

impl Query for World {}
