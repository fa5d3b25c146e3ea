extern crate sequential_utility_rules;
use sequential_utility_rules::{parse_sequences, UtilityTree};

const DATA: &str = "\
1[5] 2[3] -1 3[2] -1 SUtility:40
1[4] 2[2] -1 4[6] -2 SUtility:55
3[1] 5[8] -1 SUtility:21
1[2] 3[3] -1 SUtility:70
2[7] -1 6[1] -1 SUtility:12
";

fn main() {
    let sequences = parse_sequences(DATA).unwrap();
    let tree = UtilityTree::build(20.0, &sequences);
    println!("{:?}", tree);

    for rule in tree.rules() {
        println!("{}", rule);
    }
}
