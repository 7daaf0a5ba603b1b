pub mod input_parsers;
