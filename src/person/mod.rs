//! People the user lends money to, each with a cached debt balance.

mod core;

pub use core::{
    Person, PersonId, create_person_table, find_or_create_person, get_people, get_person_by_name,
    set_person_balance,
};
