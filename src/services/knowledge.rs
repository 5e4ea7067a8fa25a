/// Keyword groups and their canned answers, checked in order.
const ANSWERS: [(&[&str], &str); 4] = [
    (
        &["pool", "liquidez", "piscina"],
        "Liquidity pools are token deposits that enable decentralized exchange. In Hoops Finance, you can earn APY by providing liquidity to pools.",
    ),
    (
        &["hoops", "finance"],
        "Hoops Finance is a DeFi platform built on Stellar that facilitates asset exchange through liquidity pools. It offers low fees and high speed.",
    ),
    (
        &["stellar", "xlm"],
        "Stellar is the blockchain on which Hoops Finance operates. It's fast, cheap, and efficient for DeFi transactions.",
    ),
    (
        &["apy", "yield", "rendimiento"],
        "APY (Annual Percentage Yield) is the annual return you can earn by providing liquidity to pools. It varies based on demand and volume.",
    ),
];

/// Case-insensitive keyword lookup. First matching group wins.
pub fn answer(question: &str) -> Option<&'static str> {
    let question = question.to_lowercase();
    ANSWERS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
        .map(|(_, text)| *text)
}
