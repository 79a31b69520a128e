//! Element and attribute vocabulary of the persisted format

pub const TREE_BOOK: &str = "AgilityBook";
pub const TREE_DEFAULT_CONFIG: &str = "DefaultConfig";
pub const ATTRIB_BOOK_VERSION: &str = "Book";

pub const TREE_CONFIG: &str = "Configuration";
pub const ATTRIB_CONFIG_VERSION: &str = "version";
pub const ATTRIB_CONFIG_UPDATE: &str = "update";

pub const TREE_CAL_SITE: &str = "CalSite";
pub const ATTRIB_CAL_SITE_NAME: &str = "name";
pub const ATTRIB_CAL_SITE_SEARCH: &str = "search";
pub const ATTRIB_CAL_SITE_HELP: &str = "help";
pub const TREE_CAL_SITE_DESC: &str = "Desc";
pub const TREE_LOC_CODE: &str = "LocCode";
pub const ATTRIB_LOC_CODE_CODE: &str = "code";
pub const ATTRIB_LOC_CODE_NAME: &str = "name";
pub const TREE_VENUE_CODE: &str = "VenueCode";
pub const ATTRIB_VENUE_CODE_CODE: &str = "code";
pub const ATTRIB_VENUE_CODE_VENUE: &str = "venue";

pub const TREE_FAULT_TYPE: &str = "FaultType";

pub const TREE_OTHER_PTS: &str = "OtherPts";
pub const ATTRIB_OTHER_PTS_NAME: &str = "Name";
pub const ATTRIB_OTHER_PTS_COUNT: &str = "Count";
pub const ATTRIB_OTHER_PTS_DEFAULT: &str = "defValue";

pub const TREE_VENUE: &str = "Venue";
pub const ATTRIB_VENUE_NAME: &str = "Name";
pub const ATTRIB_VENUE_LONG_NAME: &str = "LongName";
pub const ATTRIB_VENUE_URL: &str = "URL";
pub const ATTRIB_VENUE_ICON: &str = "icon";
pub const TREE_VENUE_DESC: &str = "Desc";
pub const TREE_VENUE_LIFETIME_NAME: &str = "LifetimeName";
pub const ATTRIB_LIFETIME_NAME_NAME: &str = "Name";

pub const TREE_TITLES: &str = "Titles";
pub const ATTRIB_TITLES_NAME: &str = "Name";
pub const ATTRIB_TITLES_LONG_NAME: &str = "LongName";
pub const ATTRIB_TITLES_PREFIX: &str = "Prefix";
pub const ATTRIB_TITLES_VALID_FROM: &str = "ValidFrom";
pub const ATTRIB_TITLES_VALID_TO: &str = "ValidTo";
pub const ATTRIB_TITLES_MULTIPLE: &str = "Multiple";
pub const ATTRIB_TITLES_START_AT: &str = "StartAt";
pub const ATTRIB_TITLES_INCREMENT: &str = "Inc";
pub const ATTRIB_TITLES_ON_FIRST: &str = "OnFirst";

pub const TREE_DIVISION: &str = "Division";
pub const ATTRIB_DIVISION_NAME: &str = "Name";

pub const TREE_LEVEL: &str = "Level";
pub const ATTRIB_LEVEL_NAME: &str = "Name";
pub const ATTRIB_LEVEL_SHORT_NAME: &str = "ShortName";

pub const TREE_SUB_LEVEL: &str = "SubLevel";
pub const ATTRIB_SUB_LEVEL_NAME: &str = "Name";

pub const TREE_EVENT: &str = "Event";
pub const ATTRIB_EVENT_NAME: &str = "Name";
pub const ATTRIB_EVENT_SHORT_NAME: &str = "ShortName";
pub const ATTRIB_EVENT_HAS_PARTNER: &str = "hasPartner";
pub const ATTRIB_EVENT_HAS_TABLE: &str = "hasTable";
pub const ATTRIB_EVENT_HAS_SUB_NAMES: &str = "hasSubNames";
pub const TREE_EVENT_DESC: &str = "Desc";

pub const TREE_SCORING: &str = "Scoring";
pub const ATTRIB_SCORING_VALID_FROM: &str = "ValidFrom";
pub const ATTRIB_SCORING_VALID_TO: &str = "ValidTo";
pub const ATTRIB_SCORING_DIVISION: &str = "Division";
pub const ATTRIB_SCORING_LEVEL: &str = "Level";
pub const ATTRIB_SCORING_TYPE: &str = "type";
pub const ATTRIB_SCORING_DROP_FRACTIONS: &str = "dropFractions";
pub const ATTRIB_SCORING_CLEAN_Q: &str = "cleanQ";
pub const ATTRIB_SCORING_TIME_FAULTS_UNDER: &str = "underTF";
pub const ATTRIB_SCORING_TIME_FAULTS_OVER: &str = "overTF";
pub const ATTRIB_SCORING_SUBTRACT_TIME_FAULTS: &str = "subtractTF";
pub const ATTRIB_SCORING_TIME_FAULT_MULTIPLIER: &str = "timeFault";
pub const ATTRIB_SCORING_SUPER_Q: &str = "superQ";
pub const ATTRIB_SCORING_SPEED_PTS: &str = "speedPts";
pub const ATTRIB_SCORING_HAS_TABLE: &str = "hasTable";
pub const ATTRIB_SCORING_HAS_SUB_NAMES: &str = "hasSubNames";
pub const ATTRIB_SCORING_OPENING_PTS: &str = "OpeningPts";
pub const ATTRIB_SCORING_CLOSING_PTS: &str = "ClosingPts";
pub const TREE_SUB_NAME: &str = "SubName";
pub const TREE_SCORING_NOTE: &str = "Note";
pub const ATTRIB_SCORING_BONUS_PTS: &str = "bonusPts";
pub const ATTRIB_SCORING_DOUBLE_Q: &str = "doubleQ";
pub const ATTRIB_SCORING_MACH_PTS: &str = "machPts";
pub const ATTRIB_SCORING_CLEAN: &str = "Clean";
pub const ATTRIB_SCORING_FAULTS_ALLOWED: &str = "FaultsAllowed";
pub const ATTRIB_SCORING_WITH_FAULTS: &str = "WithFaults";

pub const TREE_PLACE_INFO: &str = "PlaceInfo";
pub const ATTRIB_PLACE_INFO_PLACE: &str = "Place";
pub const ATTRIB_PLACE_INFO_VALUE: &str = "Value";
pub const ATTRIB_PLACE_INFO_MUST_Q: &str = "MustQ";
pub const TREE_PLACEMENTS: &str = "Placements";

pub const TREE_TITLE_POINTS: &str = "TitlePoints";
pub const ATTRIB_TITLE_POINTS_POINTS: &str = "Points";
pub const ATTRIB_TITLE_POINTS_FAULTS: &str = "Faults";
pub const ATTRIB_TITLE_POINTS_TYPE: &str = "Type";
pub const ATTRIB_TITLE_POINTS_LIFETIME: &str = "LifeTime";

pub const TREE_LIFETIME_POINTS: &str = "LifetimePoints";
pub const TREE_LIFETIME_POINTS_LEGACY: &str = "LifeTime";
pub const ATTRIB_LIFETIME_POINTS_NAME: &str = "Name";
pub const ATTRIB_LIFETIME_POINTS_SPEED_PTS: &str = "speedPts";
pub const ATTRIB_LIFETIME_POINTS_POINTS: &str = "Points";
pub const ATTRIB_LIFETIME_POINTS_FAULTS: &str = "Faults";

pub const TREE_MULTI_Q: &str = "MultiQ";
pub const ATTRIB_MULTI_Q_NAME: &str = "Name";
pub const ATTRIB_MULTI_Q_SHORT_NAME: &str = "SName";
pub const ATTRIB_MULTI_Q_VALID_FROM: &str = "ValidFrom";
pub const ATTRIB_MULTI_Q_VALID_TO: &str = "ValidTo";
pub const TREE_MULTI_Q_ITEM: &str = "MultiQItem";
pub const ATTRIB_MULTI_Q_ITEM_DIVISION: &str = "Div";
pub const ATTRIB_MULTI_Q_ITEM_LEVEL: &str = "Level";
pub const ATTRIB_MULTI_Q_ITEM_EVENT: &str = "Event";

pub const TREE_ACTION: &str = "Action";
pub const ATTRIB_ACTION_VERB: &str = "Verb";
pub const ATTRIB_ACTION_CONFIG: &str = "Config";
pub const ATTRIB_ACTION_VENUE: &str = "Venue";
pub const ATTRIB_ACTION_DIVISION: &str = "Div";
pub const ATTRIB_ACTION_OLD_NAME: &str = "OldName";
pub const ATTRIB_ACTION_NEW_NAME: &str = "NewName";

/// Matches any division or level in a scoring rule
pub const WILDCARD: &str = "*";
