fn main() -> Result<(), Box<dyn std::error::Error>> {
    colloquy::cli::main()
}
