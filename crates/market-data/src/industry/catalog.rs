//! Industry board catalog and theme synonym table.

/// Board names in declaration order. Order breaks ties inside a match tier.
const DEFAULT_BOARDS: &[&str] = &[
    "半导体",
    "软件开发",
    "计算机设备",
    "通信设备",
    "电子元件",
    "消费电子",
    "光学光电子",
    "互联网服务",
    "游戏",
    "文化传媒",
    "电池",
    "光伏设备",
    "风电设备",
    "电网设备",
    "电力行业",
    "汽车整车",
    "汽车零部件",
    "专用设备",
    "航天航空",
    "船舶制造",
    "医疗器械",
    "医疗服务",
    "化学制药",
    "中药",
    "生物制品",
    "银行",
    "证券",
    "保险",
    "房地产开发",
    "工程建设",
    "水泥建材",
    "钢铁行业",
    "有色金属",
    "贵金属",
    "煤炭行业",
    "石油行业",
    "化学制品",
    "农牧饲渔",
    "食品饮料",
    "酿酒行业",
    "家电行业",
    "商业百货",
    "旅游酒店",
    "物流行业",
    "航运港口",
];

/// Theme phrase -> board names.
const DEFAULT_SYNONYMS: &[(&[&str], &[&str])] = &[
    (
        &["ai", "artificial intelligence", "人工智能", "大模型", "算力"],
        &["半导体", "软件开发", "计算机设备"],
    ),
    (
        &["chip", "chips", "semiconductor", "semiconductors", "芯片", "集成电路"],
        &["半导体", "电子元件"],
    ),
    (
        &["electric vehicle", "electric vehicles", "ev", "新能源汽车", "电动车", "电动汽车"],
        &["电池", "汽车整车", "汽车零部件"],
    ),
    (&["battery", "batteries", "锂电", "锂电池", "储能"], &["电池"]),
    (&["solar", "photovoltaic", "光伏"], &["光伏设备"]),
    (&["new energy", "renewable", "新能源"], &["光伏设备", "风电设备", "电池"]),
    (&["5g", "telecom", "通信"], &["通信设备"]),
    (&["software", "cloud", "云计算", "信创"], &["软件开发", "互联网服务"]),
    (&["robot", "robotics", "机器人"], &["专用设备", "计算机设备"]),
    (&["pharma", "pharmaceutical", "医药", "创新药"], &["化学制药", "生物制品", "中药"]),
    (&["healthcare", "medical", "医疗"], &["医疗器械", "医疗服务"]),
    (&["bank", "banks", "banking", "银行业"], &["银行"]),
    (&["brokerage", "broker", "券商"], &["证券"]),
    (&["insurance", "保险业"], &["保险"]),
    (&["real estate", "property", "地产", "楼市"], &["房地产开发"]),
    (&["infrastructure", "基建"], &["工程建设", "水泥建材"]),
    (&["consumer", "consumption", "消费"], &["食品饮料", "家电行业", "商业百货"]),
    (&["liquor", "baijiu", "白酒"], &["酿酒行业"]),
    (&["gold", "黄金"], &["贵金属"]),
    (&["defense", "defence", "military", "军工"], &["航天航空", "船舶制造"]),
    (&["gaming", "games", "video games"], &["游戏"]),
    (&["media", "film", "影视"], &["文化传媒"]),
    (&["shipping", "航运"], &["航运港口"]),
    (&["oil", "petroleum", "原油"], &["石油行业"]),
    (&["coal", "煤炭"], &["煤炭行业"]),
    (&["steel", "钢铁"], &["钢铁行业"]),
    (&["agriculture", "农业", "猪肉"], &["农牧饲渔"]),
    (&["tourism", "travel", "旅游"], &["旅游酒店"]),
    (&["logistics", "express delivery", "快递"], &["物流行业"]),
];

/// A theme phrase group and the boards it stands for.
#[derive(Clone, Debug, PartialEq)]
pub struct Synonym {
    pub phrases: Vec<String>,
    pub boards: Vec<String>,
}

/// Known industry boards plus the synonym table used by the third match tier.
#[derive(Clone, Debug, PartialEq)]
pub struct IndustryCatalog {
    boards: Vec<String>,
    synonyms: Vec<Synonym>,
}

impl IndustryCatalog {
    /// Catalog with the given boards and no synonyms.
    pub fn new<I, S>(boards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            boards: boards.into_iter().map(Into::into).collect(),
            synonyms: Vec::new(),
        }
    }

    /// Add a synonym group. Boards missing from the catalog are ignored at match time.
    pub fn with_synonym<P, B>(mut self, phrases: P, boards: B) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        self.synonyms.push(Synonym {
            phrases: phrases.into_iter().map(Into::into).collect(),
            boards: boards.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn boards(&self) -> &[String] {
        &self.boards
    }

    pub fn synonyms(&self) -> &[Synonym] {
        &self.synonyms
    }

    /// Declaration index of a board, used for tie-breaking.
    pub fn position(&self, board: &str) -> Option<usize> {
        self.boards.iter().position(|b| b == board)
    }
}

impl Default for IndustryCatalog {
    fn default() -> Self {
        DEFAULT_SYNONYMS.iter().fold(
            Self::new(DEFAULT_BOARDS.iter().copied()),
            |catalog, (phrases, boards)| {
                catalog.with_synonym(phrases.iter().copied(), boards.iter().copied())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_synonyms_point_at_catalog_boards() {
        let catalog = IndustryCatalog::default();
        for synonym in catalog.synonyms() {
            for board in &synonym.boards {
                assert!(
                    catalog.position(board).is_some(),
                    "synonym board {} missing from catalog",
                    board
                );
            }
        }
    }

    #[test]
    fn test_position_follows_declaration_order() {
        let catalog = IndustryCatalog::new(["Banks", "Software"]);
        assert_eq!(catalog.position("Banks"), Some(0));
        assert_eq!(catalog.position("Software"), Some(1));
        assert_eq!(catalog.position("Retail"), None);
    }
}
