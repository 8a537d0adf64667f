use crate::graph::EntityType;

pub const TECHNOLOGY: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "c++",
    "c#",
    "rust",
    "go",
    "swift",
    "react",
    "vue",
    "angular",
    "django",
    "flask",
    "fastapi",
    "node.js",
    "express",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "elasticsearch",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    "pandas",
    "numpy",
    "git",
    "github",
    "gitlab",
    "jenkins",
    "terraform",
    "ansible",
    "api",
    "rest",
    "graphql",
    "ai",
    "ml",
    "machine learning",
    "artificial intelligence",
    "neural network",
    "llm",
    "rag",
    "retrieval augmented generation",
    "vector database",
    "embedding",
    "transformer",
];

pub const TOOL: &[&str] = &[
    "vscode",
    "pycharm",
    "intellij",
    "eclipse",
    "vim",
    "emacs",
    "sublime text",
    "postman",
    "curl",
    "wget",
    "jupyter",
    "colab",
    "notebook",
    "terminal",
    "cli",
    "bash",
    "powershell",
    "ssh",
    "ftp",
    "sftp",
    "rsync",
    "pip",
    "npm",
    "yarn",
    "conda",
    "virtualenv",
    "pipenv",
    "poetry",
    "make",
    "cmake",
    "gradle",
    "maven",
];

pub const METHOD: &[&str] = &[
    "algorithm",
    "data structure",
    "sorting",
    "searching",
    "recursion",
    "iteration",
    "oop",
    "object oriented",
    "functional programming",
    "design pattern",
    "mvc",
    "microservices",
    "monolith",
    "crud",
    "authentication",
    "authorization",
    "encryption",
    "hashing",
    "caching",
    "optimization",
    "refactoring",
    "testing",
    "debugging",
    "deployment",
    "ci/cd",
    "devops",
    "agile",
    "scrum",
    "kanban",
    "tdd",
    "bdd",
];

pub const ORGANIZATION: &[&str] = &[
    "google",
    "microsoft",
    "amazon",
    "meta",
    "facebook",
    "apple",
    "netflix",
    "uber",
    "airbnb",
    "twitter",
    "linkedin",
    "github",
    "gitlab",
    "stackoverflow",
    "reddit",
    "openai",
    "anthropic",
    "deepmind",
    "nasa",
    "mit",
    "stanford",
    "berkeley",
    "cmu",
];

/// Keyword tables in scan order
pub const KEYWORD_RULES: &[(EntityType, &[&str])] = &[
    (EntityType::Technology, TECHNOLOGY),
    (EntityType::Tool, TOOL),
    (EntityType::Method, METHOD),
    (EntityType::Organization, ORGANIZATION),
];

/// All-caps tokens too generic to be concepts
pub const CAPS_STOPLIST: &[&str] = &["API", "URL", "HTTP", "JSON", "XML", "CSS", "SQL"];
