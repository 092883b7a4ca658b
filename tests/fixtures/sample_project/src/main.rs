// Sample Rust file for testing
// [[main_entry|Main entry point]]

fn main() {
    // [[greeting|Hello World]]
    println!("Hello from sample project! [[not_an_anchor|x]]");
}

// Read [[#setup|setup]] before running.
fn helper_function() -> i32 {
    42
}
