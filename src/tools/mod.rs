pub mod markdown_fix;
