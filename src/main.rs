fn main() {
    mineshish_lib::run()
}
