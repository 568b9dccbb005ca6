//! Shipped label/code tables
//!
//! Codes are stable identifiers stored by the platform; labels are the text
//! exported spreadsheets carry. Aliases cover the spellings seen in real
//! exports. Changing a code requires bumping
//! [`VOCABULARY_VERSION`](crate::constants::VOCABULARY_VERSION).

/// One label/code pair of a vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabEntry {
    pub code: i32,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
}

const fn entry(code: i32, label: &'static str, aliases: &'static [&'static str]) -> VocabEntry {
    VocabEntry {
        code,
        label,
        aliases,
    }
}

pub const PREFECTURES: &[VocabEntry] = &[
    entry(1, "北海道", &[]),
    entry(2, "青森県", &["青森"]),
    entry(3, "岩手県", &["岩手"]),
    entry(4, "宮城県", &["宮城"]),
    entry(5, "秋田県", &["秋田"]),
    entry(6, "山形県", &["山形"]),
    entry(7, "福島県", &["福島"]),
    entry(8, "茨城県", &["茨城"]),
    entry(9, "栃木県", &["栃木"]),
    entry(10, "群馬県", &["群馬"]),
    entry(11, "埼玉県", &["埼玉"]),
    entry(12, "千葉県", &["千葉"]),
    entry(13, "東京都", &["東京"]),
    entry(14, "神奈川県", &["神奈川"]),
    entry(15, "新潟県", &["新潟"]),
    entry(16, "富山県", &["富山"]),
    entry(17, "石川県", &["石川"]),
    entry(18, "福井県", &["福井"]),
    entry(19, "山梨県", &["山梨"]),
    entry(20, "長野県", &["長野"]),
    entry(21, "岐阜県", &["岐阜"]),
    entry(22, "静岡県", &["静岡"]),
    entry(23, "愛知県", &["愛知"]),
    entry(24, "三重県", &["三重"]),
    entry(25, "滋賀県", &["滋賀"]),
    entry(26, "京都府", &["京都"]),
    entry(27, "大阪府", &["大阪"]),
    entry(28, "兵庫県", &["兵庫"]),
    entry(29, "奈良県", &["奈良"]),
    entry(30, "和歌山県", &["和歌山"]),
    entry(31, "鳥取県", &["鳥取"]),
    entry(32, "島根県", &["島根"]),
    entry(33, "岡山県", &["岡山"]),
    entry(34, "広島県", &["広島"]),
    entry(35, "山口県", &["山口"]),
    entry(36, "徳島県", &["徳島"]),
    entry(37, "香川県", &["香川"]),
    entry(38, "愛媛県", &["愛媛"]),
    entry(39, "高知県", &["高知"]),
    entry(40, "福岡県", &["福岡"]),
    entry(41, "佐賀県", &["佐賀"]),
    entry(42, "長崎県", &["長崎"]),
    entry(43, "熊本県", &["熊本"]),
    entry(44, "大分県", &["大分"]),
    entry(45, "宮崎県", &["宮崎"]),
    entry(46, "鹿児島県", &["鹿児島"]),
    entry(47, "沖縄県", &["沖縄"]),
];

pub const INDUSTRIES: &[VocabEntry] = &[
    entry(1, "IT・通信", &["IT", "通信"]),
    entry(2, "メーカー", &["製造"]),
    entry(3, "商社", &[]),
    entry(4, "金融・保険", &["金融", "保険"]),
    entry(5, "不動産・建設", &["不動産", "建設"]),
    entry(6, "小売・流通", &["小売", "流通"]),
    entry(7, "サービス", &[]),
    entry(8, "医療・福祉", &["医療", "福祉"]),
    entry(9, "広告・マスコミ", &["広告", "マスコミ"]),
    entry(10, "コンサルティング", &["コンサル"]),
    entry(11, "人材", &["人材サービス"]),
    entry(12, "教育", &[]),
    entry(13, "運輸・物流", &["運輸", "物流"]),
    entry(14, "エネルギー", &[]),
    entry(15, "官公庁・団体", &["官公庁"]),
    entry(99, "その他", &[]),
];

pub const OCCUPATIONS: &[VocabEntry] = &[
    entry(1, "営業", &[]),
    entry(2, "事務・アシスタント", &["事務"]),
    entry(3, "企画・マーケティング", &["マーケティング"]),
    entry(4, "経営企画", &[]),
    entry(5, "人事", &[]),
    entry(6, "経理・財務", &["経理", "財務"]),
    entry(7, "法務", &[]),
    entry(8, "ITエンジニア", &["SE", "プログラマー"]),
    entry(9, "インフラエンジニア", &[]),
    entry(10, "Webデザイナー", &["デザイナー"]),
    entry(11, "機械設計", &[]),
    entry(12, "電気・電子設計", &["電気設計"]),
    entry(13, "生産管理", &[]),
    entry(14, "品質管理", &[]),
    entry(15, "研究開発", &[]),
    entry(16, "施工管理", &[]),
    entry(17, "コンサルタント", &[]),
    entry(18, "販売・接客", &["販売"]),
    entry(19, "介護・福祉", &["介護"]),
    entry(20, "医療専門職", &[]),
    entry(21, "ドライバー", &[]),
    entry(22, "軽作業", &[]),
    entry(99, "その他", &[]),
];

pub const LICENSES: &[VocabEntry] = &[
    entry(1, "普通自動車第一種運転免許", &["普通免許", "普通自動車免許"]),
    entry(2, "日商簿記2級", &["簿記2級"]),
    entry(3, "日商簿記1級", &["簿記1級"]),
    entry(4, "TOEIC600点以上", &["TOEIC600"]),
    entry(5, "TOEIC800点以上", &["TOEIC800"]),
    entry(6, "基本情報技術者", &[]),
    entry(7, "応用情報技術者", &[]),
    entry(8, "宅地建物取引士", &["宅建"]),
    entry(9, "社会保険労務士", &["社労士"]),
    entry(10, "税理士", &[]),
    entry(11, "公認会計士", &[]),
    entry(12, "看護師", &[]),
    entry(13, "介護福祉士", &[]),
    entry(14, "一級建築士", &["1級建築士"]),
    entry(15, "二級建築士", &["2級建築士"]),
    entry(16, "第二種電気工事士", &[]),
    entry(17, "フォークリフト", &[]),
];

pub const EMPLOYMENT_TYPES: &[VocabEntry] = &[
    entry(1, "正社員", &[]),
    entry(2, "契約社員", &[]),
    entry(3, "派遣社員", &["派遣"]),
    entry(4, "アルバイト・パート", &["アルバイト", "パート"]),
    entry(5, "業務委託", &[]),
    entry(6, "紹介予定派遣", &[]),
];

pub const WORK_EXPERIENCE: &[VocabEntry] = &[
    entry(1, "社会人経験不問", &["不問"]),
    entry(2, "社会人経験", &["社会人経験あり"]),
    entry(3, "業界経験", &[]),
    entry(4, "職種経験", &[]),
    entry(5, "業界・職種経験", &[]),
];

pub const GENDERS: &[VocabEntry] = &[
    entry(1, "男性", &["男"]),
    entry(2, "女性", &["女"]),
    entry(3, "その他", &[]),
];

pub const EDUCATION: &[VocabEntry] = &[
    entry(1, "中学校卒", &["中卒"]),
    entry(2, "高校卒", &["高卒"]),
    entry(3, "専門学校卒", &["専門卒"]),
    entry(4, "高専卒", &[]),
    entry(5, "短大卒", &["短大"]),
    entry(6, "大学卒", &["大卒"]),
    entry(7, "大学院卒", &["院卒"]),
];

pub const LANGUAGES: &[VocabEntry] = &[
    entry(1, "英語", &[]),
    entry(2, "中国語", &[]),
    entry(3, "韓国語", &[]),
    entry(4, "スペイン語", &[]),
    entry(5, "フランス語", &[]),
    entry(6, "ドイツ語", &[]),
    entry(7, "ポルトガル語", &[]),
    entry(8, "ベトナム語", &[]),
    entry(99, "その他", &[]),
];

pub const LANGUAGE_LEVELS: &[VocabEntry] = &[
    entry(1, "日常会話", &["日常会話レベル"]),
    entry(2, "ビジネス", &["ビジネスレベル"]),
    entry(3, "ネイティブ", &["ネイティブレベル"]),
];
