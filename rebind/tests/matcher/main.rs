mod arguments;
mod range;
