mod forward;
mod returns;
