fn main() {
    vsp::app::cli::run();
}
