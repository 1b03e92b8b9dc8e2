mod cases;

mod bus_types;
mod pf;
