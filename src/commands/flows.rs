//! Implementation of the `flows` subcommand.

use crate::flow;

/// Prints the name of every available flow, one per line.
pub fn flows() {
    for name in flow::names() {
        println!("{name}");
    }
}
