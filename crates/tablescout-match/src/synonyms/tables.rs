//! Curated food vocabularies. All entries are already in normalized form.

/// Canonical dish or venue term → interchangeable names.
pub(super) const SYNONYMS: &[(&str, &[&str])] = &[
    ("pizza", &["pizzeria", "pie", "flatbread"]),
    ("burger", &["hamburger", "cheeseburger", "slider"]),
    ("sandwich", &["sub", "hoagie", "hero", "grinder", "panini"]),
    ("hot dog", &["frankfurter", "wiener", "frank"]),
    ("fries", &["french fries", "chips", "frites"]),
    ("coffee", &["espresso", "latte", "cappuccino", "cafe", "coffeehouse"]),
    ("tea", &["chai", "teahouse"]),
    ("bubble tea", &["boba", "milk tea", "tapioca tea"]),
    ("taco", &["taqueria"]),
    ("burrito", &["wrap"]),
    ("noodle", &["ramen", "pho", "udon", "soba", "lo mein"]),
    ("sushi", &["sashimi", "maki", "nigiri", "omakase"]),
    ("barbecue", &["bbq", "barbeque", "smokehouse"]),
    ("ice cream", &["gelato", "frozen yogurt", "soft serve", "creamery"]),
    ("donut", &["doughnut"]),
    ("chicken wing", &["wing", "buffalo wing"]),
    ("dumpling", &["gyoza", "potsticker", "dim sum", "bao", "momo"]),
    ("steak", &["steakhouse", "ribeye", "sirloin", "filet mignon"]),
    ("curry", &["masala", "tikka", "vindaloo", "korma"]),
    ("shawarma", &["gyro", "doner", "kebab", "kabob"]),
    ("pancake", &["flapjack", "hotcake", "crepe"]),
    ("soup", &["broth", "chowder", "bisque", "stew"]),
    ("bakery", &["patisserie", "pastry shop", "boulangerie"]),
    ("beer", &["brewery", "brewpub", "taproom", "pub"]),
    ("wine", &["winery", "wine bar", "enoteca"]),
    ("diner", &["luncheonette", "greasy spoon"]),
    ("deli", &["delicatessen", "bodega"]),
    ("juice", &["smoothie", "juice bar"]),
    ("poke", &["poke bowl"]),
    ("fried chicken", &["chicken tenders", "chicken strips", "nuggets"]),
];

/// Cuisine family → representative dishes.
pub(super) const CUISINE_FAMILIES: &[(&str, &[&str])] = &[
    (
        "italian",
        &["pizza", "pasta", "lasagna", "risotto", "gelato", "calzone", "gnocchi", "tiramisu"],
    ),
    (
        "mexican",
        &["taco", "burrito", "quesadilla", "enchilada", "tamale", "nachos", "churro", "pozole"],
    ),
    (
        "japanese",
        &["sushi", "ramen", "udon", "tempura", "teriyaki", "sashimi", "yakitori", "katsu"],
    ),
    (
        "chinese",
        &["dumpling", "dim sum", "lo mein", "fried rice", "kung pao", "chow mein", "peking duck"],
    ),
    (
        "indian",
        &["curry", "tikka masala", "biryani", "naan", "samosa", "tandoori", "dosa"],
    ),
    ("thai", &["pad thai", "green curry", "tom yum", "satay", "larb"]),
    (
        "american",
        &["burger", "hot dog", "fries", "barbecue", "chicken wing", "mac and cheese", "meatloaf"],
    ),
    (
        "mediterranean",
        &["falafel", "hummus", "shawarma", "gyro", "kebab", "pita", "tabbouleh"],
    ),
    ("french", &["croissant", "crepe", "baguette", "quiche", "escargot", "ratatouille"]),
    ("vietnamese", &["pho", "banh mi", "spring roll", "bun cha", "vermicelli"]),
    ("korean", &["bibimbap", "bulgogi", "kimchi", "korean barbecue", "tteokbokki"]),
    ("greek", &["gyro", "souvlaki", "moussaka", "spanakopita", "tzatziki"]),
];

/// Meal time → typical dishes.
pub(super) const MEAL_TIMES: &[(&str, &[&str])] = &[
    (
        "breakfast",
        &["pancake", "waffle", "omelette", "bagel", "eggs", "bacon", "coffee", "breakfast burrito"],
    ),
    (
        "brunch",
        &["eggs benedict", "mimosa", "french toast", "avocado toast", "quiche"],
    ),
    ("lunch", &["sandwich", "salad", "soup", "wrap", "burger"]),
    ("dinner", &["steak", "pasta", "seafood", "roast"]),
    ("late night", &["pizza", "taco", "diner", "hot dog"]),
];

/// Food category → subcategory → member terms.
pub(super) const FOOD_CATEGORIES: &[(&str, &[(&str, &[&str])])] = &[
    (
        "seafood",
        &[
            ("fish", &["salmon", "tuna", "cod", "halibut", "fish and chips", "fish taco"]),
            ("shellfish", &["shrimp", "lobster", "crab", "oyster", "clam", "mussel", "scallop"]),
        ],
    ),
    (
        "dessert",
        &[
            ("baked goods", &["cake", "cupcake", "pie", "cookie", "donut", "croissant", "brownie"]),
            ("frozen dessert", &["ice cream", "gelato", "frozen yogurt", "sorbet", "milkshake"]),
        ],
    ),
    (
        "drinks",
        &[
            ("coffee drinks", &["espresso", "latte", "cappuccino", "cold brew", "mocha"]),
            ("tea drinks", &["bubble tea", "matcha", "chai", "herbal tea"]),
            ("alcohol", &["beer", "wine", "cocktail", "sake", "cider"]),
        ],
    ),
    (
        "vegetarian",
        &[
            ("plant based", &["tofu", "tempeh", "seitan", "veggie burger", "impossible burger"]),
            ("bowls", &["salad", "grain bowl", "poke", "buddha bowl", "acai bowl"]),
        ],
    ),
    (
        "fast food",
        &[
            ("burgers", &["burger", "cheeseburger", "slider"]),
            ("chicken", &["fried chicken", "chicken tenders", "chicken wing", "nuggets"]),
            ("sandwiches", &["sandwich", "sub", "hoagie", "wrap"]),
        ],
    ),
];
