mod driver;
mod rewriter;
