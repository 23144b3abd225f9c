use compound_circles::run;

fn main() {
    pollster::block_on(run());
}
