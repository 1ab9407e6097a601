mod cart;
mod catalog;
mod helpers;
mod orders;
mod payments;
